use axum::extract::State;
use axum::Json;

use crate::models::job::ResultSet;
use crate::state::AppState;
use crate::store::site_state::SiteState;

/// GET /api/jobs/results
/// Returns the last completed ranking verbatim; no recomputation.
pub async fn handle_results(State(state): State<AppState>) -> Json<ResultSet> {
    Json(state.results.read().await)
}

/// GET /api/site-state
pub async fn handle_site_state(State(state): State<AppState>) -> Json<SiteState> {
    Json(state.site_state.read().await)
}
