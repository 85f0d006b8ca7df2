use askama::Template;
use axum::{extract::State, response::Html};

use crate::router::PortfolioState;
use crate::service::load_portfolio;
use crate::view::PortfolioPage;
use crate::PortfolioError;

/// GET / -> the whole portfolio page.
///
/// Store failures never fail the request; they render as empty sections.
pub async fn portfolio_page(
    State(state): State<PortfolioState>,
) -> Result<Html<String>, PortfolioError> {
    let snapshot = load_portfolio(&state.api).await;
    let html = PortfolioPage::new(snapshot).render()?;
    Ok(Html(html))
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}
