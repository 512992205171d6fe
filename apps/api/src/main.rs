mod catalog;
mod config;
mod errors;
mod matching;
mod models;
mod oracle;
mod pipeline;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::JobCatalog;
use crate::config::Config;
use crate::oracle::{GeminiOracle, ScoringOracle};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::profile::FileProfileStore;
use crate::store::results::ResultCache;
use crate::store::site_state::SiteStateStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Garimpo API v{}", env!("CARGO_PKG_VERSION"));

    // File-backed stores under DATA_DIR
    let catalog = Arc::new(JobCatalog::load_or_default(&config.data_dir));
    let profiles = Arc::new(FileProfileStore::new(&config.data_dir));
    let site_state = Arc::new(SiteStateStore::open(&config.data_dir));
    let results = Arc::new(ResultCache::open(&config.data_dir));

    // Scoring oracle, if configured
    let oracle: Option<Arc<dyn ScoringOracle>> = match config.gemini_api_key.clone() {
        Some(api_key) => {
            let oracle = GeminiOracle::new(api_key, config.gemini_model.clone());
            info!("Scoring oracle initialized (model: {})", oracle.model());
            Some(Arc::new(oracle))
        }
        None => {
            warn!("GEMINI_API_KEY not set — intelligent search disabled");
            None
        }
    };

    let state = AppState {
        catalog,
        profiles,
        site_state,
        results,
        oracle,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
