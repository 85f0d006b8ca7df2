use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::db::{TableQuery, TableStore, tables};
use crate::error::PortfolioError;
use crate::types::{Experience, Profile, Project, ProjectTag, Skill};

const ORDER_COLUMN: &str = "order_index";

/// Read accessors for the portfolio tables.
///
/// Every accessor fails soft: store or decode errors are logged and turn
/// into `None` or an empty vec. Nothing is cached or retried.
#[derive(Clone)]
pub struct PortfolioApi {
    store: Arc<dyn TableStore>,
}

impl PortfolioApi {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// The single profile row, if any.
    pub async fn get_profile(&self) -> Option<Profile> {
        let query = TableQuery::table(tables::PROFILE).single();
        match self.fetch::<Profile>(&query).await {
            Ok(rows) => rows.into_iter().next(),
            Err(e) => {
                error!(table = tables::PROFILE, error = %e, "failed to load profile");
                None
            }
        }
    }

    /// Projects by ascending `order_index`, each with its tags.
    ///
    /// A failed tag read leaves every project with no tags.
    pub async fn get_projects(&self) -> Vec<Project> {
        let project_query = TableQuery::table(tables::PROJECTS).order_asc(ORDER_COLUMN);
        let tag_query = TableQuery::table(tables::PROJECT_TAGS);
        let (projects, tags) = futures::join!(
            self.fetch::<Project>(&project_query),
            self.fetch::<ProjectTag>(&tag_query)
        );

        let mut projects = match projects {
            Ok(rows) => rows,
            Err(e) => {
                error!(table = tables::PROJECTS, error = %e, "failed to load projects");
                return Vec::new();
            }
        };

        let tags = match tags {
            Ok(rows) => rows,
            Err(e) => {
                warn!(
                    table = tables::PROJECT_TAGS,
                    error = %e,
                    "failed to load project tags; rendering projects without tags"
                );
                Vec::new()
            }
        };

        attach_tags(&mut projects, tags);
        projects
    }

    /// Experience entries by ascending `order_index`.
    pub async fn get_experience(&self) -> Vec<Experience> {
        self.fetch_ordered(tables::EXPERIENCE).await
    }

    /// Skills by ascending `order_index`.
    pub async fn get_skills(&self) -> Vec<Skill> {
        self.fetch_ordered(tables::SKILLS).await
    }

    async fn fetch_ordered<T: DeserializeOwned>(&self, table: &'static str) -> Vec<T> {
        let query = TableQuery::table(table).order_asc(ORDER_COLUMN);
        self.fetch(&query)
            .await
            .inspect_err(|e| error!(table, error = %e, "failed to load table"))
            .unwrap_or_default()
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        query: &TableQuery,
    ) -> Result<Vec<T>, PortfolioError> {
        let rows = self.store.select(query).await?;
        debug!(table = %query.table, count = rows.len(), "rows fetched");
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(PortfolioError::from))
            .collect()
    }
}

/// Give each project exactly the tags whose `project_id` matches its id.
fn attach_tags(projects: &mut [Project], tags: Vec<ProjectTag>) {
    let mut by_project: HashMap<String, Vec<String>> = HashMap::new();
    for ProjectTag { project_id, tag } in tags {
        by_project.entry(project_id).or_default().push(tag);
    }
    for project in projects.iter_mut() {
        project.tags = by_project.remove(&project.id).unwrap_or_default();
    }
}
