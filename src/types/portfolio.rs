//! Rows of the portfolio tables.
//!
//! Text columns are nullable in the store; a `null` decodes to the empty
//! string instead of failing the whole read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bio: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub github_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub linkedin_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub available_for_work: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A project row. `tags` is not a column of `projects`; it is filled from
/// `project_tags` after the read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: String,
    pub order_index: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the `project_tags` associative table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectTag {
    pub project_id: String,
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Experience {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    /// Free-text label such as "2020 - 2022".
    #[serde(default, deserialize_with = "null_as_default")]
    pub period: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub order_index: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub order_index: i64,
    pub created_at: DateTime<Utc>,
}

/// Everything the page shows, as returned by one load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioSnapshot {
    pub profile: Option<Profile>,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
    pub skills: Vec<Skill>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
