pub mod page;

pub use page::{PortfolioPage, ProfileLinks, ProjectCard};
