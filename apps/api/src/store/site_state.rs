//! Persistent site state: last-used search preferences and search
//! timestamp, kept for UI prefill. Outside the core pipeline.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use crate::models::preferences::PreferenceSet;
use crate::store::persist_json;

const SITE_STATE_FILE: &str = "site_state.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteState {
    pub job_search_preferences: PreferenceSet,
    pub last_job_search_at: Option<DateTime<Utc>>,
}

pub struct SiteStateStore {
    slot: RwLock<SiteState>,
    path: PathBuf,
}

impl SiteStateStore {
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(SITE_STATE_FILE);
        let slot = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!("ignoring invalid site state at {}: {err}", path.display());
                SiteState::default()
            }),
            Err(_) => SiteState::default(),
        };
        Self {
            slot: RwLock::new(slot),
            path,
        }
    }

    pub async fn read(&self) -> SiteState {
        self.slot.read().await.clone()
    }

    /// Records the preferences used by a search, stamping the search time.
    pub async fn record_search(&self, preferences: &PreferenceSet) {
        let state = SiteState {
            job_search_preferences: preferences.clone(),
            last_job_search_at: Some(Utc::now()),
        };
        *self.slot.write().await = state.clone();
        if let Err(err) = persist_json(&self.path, &state).await {
            warn!("failed to persist site state: {err}");
        }
    }
}
