//! Result cache — single-slot store of the last completed ranking.
//!
//! Not keyed per caller: concurrent searches race and the last writer wins,
//! which makes this meaningful only as "last search result". The in-memory
//! slot is authoritative; disk persistence is best-effort so results survive
//! a restart.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::models::job::{RankedJob, ResultSet};
use crate::store::persist_json;

const CACHE_FILE: &str = "jobs_cache.json";

pub struct ResultCache {
    slot: RwLock<ResultSet>,
    path: PathBuf,
}

impl ResultCache {
    /// Opens the cache, reloading the last persisted result set if one
    /// exists. A missing or unreadable file yields the empty set.
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(CACHE_FILE);
        let slot = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!("ignoring invalid jobs cache at {}: {err}", path.display());
                ResultSet::default()
            }),
            Err(_) => ResultSet::default(),
        };
        Self {
            slot: RwLock::new(slot),
            path,
        }
    }

    /// Last written value, or `{updated_at: null, results: []}` before the
    /// first completed search.
    pub async fn read(&self) -> ResultSet {
        self.slot.read().await.clone()
    }

    /// Overwrites the slot with a completed ranking, stamping `updated_at`.
    pub async fn store(&self, results: Vec<RankedJob>) -> ResultSet {
        let set = ResultSet {
            updated_at: Some(Utc::now()),
            results,
        };
        *self.slot.write().await = set.clone();
        if let Err(err) = persist_json(&self.path, &set).await {
            warn!("failed to persist jobs cache: {err}");
        }
        set
    }
}
