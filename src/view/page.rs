use askama::Template;
use chrono::{Datelike, Utc};

use crate::types::{Experience, PortfolioSnapshot, Profile, Project, Skill};

pub const FALLBACK_TITLE: &str = "Full Stack Developer";
pub const FALLBACK_BIO: &str =
    "Crafting beautiful, scalable web applications with modern technologies and best practices.";
pub const FALLBACK_OWNER: &str = "Portfolio";

/// Contact links taken from the profile. Empty values are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileLinks {
    pub email: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

impl ProfileLinks {
    fn from_profile(profile: Option<&Profile>) -> Self {
        let Some(p) = profile else {
            return Self::default();
        };
        Self {
            email: non_empty(&p.email),
            github: non_empty(&p.github_url),
            linkedin: non_empty(&p.linkedin_url),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.github.is_none() && self.linkedin.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCard {
    pub title: String,
    pub description: String,
    /// Only set for real targets; `#` and empty links are hidden.
    pub link: Option<String>,
    pub tags: Vec<String>,
}

impl From<Project> for ProjectCard {
    fn from(p: Project) -> Self {
        let link = non_empty(&p.link).filter(|l| l != "#");
        Self {
            title: p.title,
            description: p.description,
            link,
            tags: p.tags,
        }
    }
}

/// The whole single-page portfolio.
#[derive(Template, Debug)]
#[template(path = "portfolio.html")]
pub struct PortfolioPage {
    pub title: String,
    pub bio: String,
    pub available_for_work: bool,
    pub owner: String,
    pub year: i32,
    pub links: ProfileLinks,
    pub projects: Vec<ProjectCard>,
    pub experience: Vec<Experience>,
    pub skills: Vec<Skill>,
}

impl PortfolioPage {
    pub fn new(snapshot: PortfolioSnapshot) -> Self {
        Self::with_year(snapshot, Utc::now().year())
    }

    pub fn with_year(snapshot: PortfolioSnapshot, year: i32) -> Self {
        let PortfolioSnapshot {
            profile,
            projects,
            experience,
            skills,
        } = snapshot;
        let profile = profile.as_ref();

        Self {
            title: profile
                .and_then(|p| non_empty(&p.title))
                .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            bio: profile
                .and_then(|p| non_empty(&p.bio))
                .unwrap_or_else(|| FALLBACK_BIO.to_string()),
            available_for_work: profile.is_some_and(|p| p.available_for_work),
            owner: profile
                .and_then(|p| non_empty(&p.name))
                .unwrap_or_else(|| FALLBACK_OWNER.to_string()),
            year,
            links: ProfileLinks::from_profile(profile),
            projects: projects.into_iter().map(ProjectCard::from).collect(),
            experience,
            skills,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
