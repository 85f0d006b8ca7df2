use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::api::PortfolioApi;
use crate::handlers::portfolio::{healthz, portfolio_page};

#[derive(Clone)]
pub struct PortfolioState {
    pub api: PortfolioApi,
}

impl PortfolioState {
    pub fn new(api: PortfolioApi) -> Self {
        Self { api }
    }
}

pub fn portfolio_router(state: PortfolioState) -> Router {
    Router::new()
        .route("/", get(portfolio_page))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
