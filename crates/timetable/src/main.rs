use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use timetable::config::AppConfig;
use timetable::plans::PlanRepository;
use timetable::server::create_router;
use timetable::store::SqliteStore;
use timetable::timetable::{load_baseline, Catalog, Workspace};
use timetable::types::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    info!("Loaded configuration: {:?}", config);

    let baseline = match &config.baseline_path {
        Some(path) => load_baseline(path).context("failed to load baseline catalog")?,
        None => Vec::new(),
    };
    let catalog = Catalog::with_baseline(baseline);
    info!(
        "Catalog ready with {} baseline courses (next id {:?})",
        catalog.len(),
        catalog.next_id()
    );

    let store = SqliteStore::open(&config.database_path).context("failed to open plan store")?;
    let plans = PlanRepository::with_key(Arc::new(store), config.storage_key.clone());
    info!("Found {} saved plans", plans.list().len());

    let address = config.listen_address();
    let workspace = Workspace::new(catalog, plans, config.period_count);
    let app_state = Arc::new(AppState::new(workspace, config));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server listening on http://{}", address);

    axum::serve(listener, create_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
