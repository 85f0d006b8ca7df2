use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PortfolioError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Missing configuration value: {0}")]
    MissingConfig(&'static str),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("Store unavailable for table `{0}`")]
    StoreUnavailable(String),

    #[error("Template render error: {0}")]
    Template(#[from] askama::Error),
}

impl From<figment::Error> for PortfolioError {
    fn from(e: figment::Error) -> Self {
        PortfolioError::Config(Box::new(e))
    }
}

impl IntoResponse for PortfolioError {
    fn into_response(self) -> axum::response::Response {
        // Data failures never reach here; they degrade to empty sections.
        let status = match self {
            PortfolioError::UpstreamStatus(_)
            | PortfolioError::Reqwest(_)
            | PortfolioError::StoreUnavailable(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Html(format!(
                "<!doctype html><title>{}</title><p>Something went wrong.</p>",
                status
            )),
        )
            .into_response()
    }
}
