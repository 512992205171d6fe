//! Profile store boundary. The candidate profile is produced by the
//! external résumé pipeline; this service only reads the snapshot.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use crate::models::profile::CandidateProfile;

const PROFILE_FILE: &str = "user_profile.json";

/// Read-only access to the candidate profile. `None` means no résumé has
/// been ingested yet and searches must refuse to start.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load(&self) -> Option<CandidateProfile>;
}

pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(PROFILE_FILE),
        }
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn load(&self) -> Option<CandidateProfile> {
        let raw = tokio::fs::read_to_string(&self.path).await.ok()?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(err) => {
                warn!("invalid profile at {}: {err}", self.path.display());
                None
            }
        }
    }
}
