//! Table-backed store access.
//!
//! Layout:
//! - `store.rs`: the `TableStore` trait and the `TableQuery` it accepts
//! - `postgrest.rs`: hosted store over the PostgREST HTTP interface
//! - `memory.rs`: in-memory tables, including the static development fixture

pub mod memory;
pub mod postgrest;
pub mod store;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;
pub use store::{TableQuery, TableStore};

/// Logical tables read by the portfolio.
pub mod tables {
    pub const PROFILE: &str = "profile";
    pub const PROJECTS: &str = "projects";
    pub const PROJECT_TAGS: &str = "project_tags";
    pub const EXPERIENCE: &str = "experience";
    pub const SKILLS: &str = "skills";
}
