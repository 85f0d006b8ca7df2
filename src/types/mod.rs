pub mod portfolio;

pub use portfolio::{Experience, PortfolioSnapshot, Profile, Project, ProjectTag, Skill};
