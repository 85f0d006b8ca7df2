use std::sync::Arc;

use folio_nexus::config::{Config, DataSource};
use folio_nexus::db::{MemoryStore, PostgrestStore, TableStore};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.basic.listen_addr,
        source = ?cfg.store.source,
        store_url = %cfg.store.url.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        proxy = %cfg.basic.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        loglevel = %cfg.basic.loglevel,
    );

    let store: Arc<dyn TableStore> = match cfg.store.source {
        DataSource::Remote => {
            let (url, key) = cfg.store.credentials()?;
            Arc::new(PostgrestStore::new(&url, &key, cfg.basic.proxy.as_ref())?)
        }
        DataSource::Fixture => {
            warn!("serving static fixture data; not for production");
            Arc::new(MemoryStore::fixture())
        }
    };

    let state = folio_nexus::router::PortfolioState::new(folio_nexus::PortfolioApi::new(store));
    let app = folio_nexus::router::portfolio_router(state);

    let listener = TcpListener::bind(cfg.basic.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
