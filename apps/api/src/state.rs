use std::sync::Arc;

use crate::catalog::JobCatalog;
use crate::oracle::ScoringOracle;
use crate::store::profile::ProfileStore;
use crate::store::results::ResultCache;
use crate::store::site_state::SiteStateStore;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<JobCatalog>,
    pub profiles: Arc<dyn ProfileStore>,
    pub site_state: Arc<SiteStateStore>,
    pub results: Arc<ResultCache>,
    /// `None` when `GEMINI_API_KEY` is not configured; searches then end
    /// with an error narration instead of calling the oracle.
    pub oracle: Option<Arc<dyn ScoringOracle>>,
}
