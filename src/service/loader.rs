use tracing::{debug, error};

use crate::api::PortfolioApi;
use crate::types::PortfolioSnapshot;

/// Run the four reads concurrently and wait for all of them.
///
/// Each read runs as its own task. If any task fails to complete (panic or
/// cancellation) the whole load is discarded and the empty snapshot is
/// returned, so the page still renders with every section empty.
pub async fn load_portfolio(api: &PortfolioApi) -> PortfolioSnapshot {
    debug!("loading portfolio");

    let profile = tokio::spawn({
        let api = api.clone();
        async move { api.get_profile().await }
    });
    let projects = tokio::spawn({
        let api = api.clone();
        async move { api.get_projects().await }
    });
    let experience = tokio::spawn({
        let api = api.clone();
        async move { api.get_experience().await }
    });
    let skills = tokio::spawn({
        let api = api.clone();
        async move { api.get_skills().await }
    });

    match tokio::try_join!(profile, projects, experience, skills) {
        Ok((profile, projects, experience, skills)) => {
            debug!(
                has_profile = profile.is_some(),
                projects = projects.len(),
                experience = experience.len(),
                skills = skills.len(),
                "portfolio loaded"
            );
            PortfolioSnapshot {
                profile,
                projects,
                experience,
                skills,
            }
        }
        Err(e) => {
            error!(error = %e, "error loading portfolio data");
            PortfolioSnapshot::default()
        }
    }
}
