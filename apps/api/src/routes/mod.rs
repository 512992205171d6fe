pub mod health;

use axum::{routing::get, Router};

use crate::matching;
use crate::pipeline;
use crate::state::AppState;
use crate::store;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/jobs/search",
            get(pipeline::handlers::handle_search_sse).post(pipeline::handlers::handle_search_poll),
        )
        .route("/api/jobs/results", get(store::handlers::handle_results))
        .route(
            "/api/jobs/suggest-keywords",
            get(matching::handlers::handle_suggest_keywords),
        )
        .route("/api/site-state", get(store::handlers::handle_site_state))
        .with_state(state)
}
