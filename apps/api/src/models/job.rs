use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single job posting from the catalog. Immutable per search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: Option<String>,
    pub description: String,
    /// Free-text recency label ("2 dias", "1 semana").
    pub posted: String,
}

/// A posting after ranking: scored, explained, positioned, and enriched
/// with an application contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedJob {
    #[serde(flatten)]
    pub posting: JobPosting,
    /// 0..=100, clamped at reconciliation.
    pub score: u8,
    pub reason: String,
    /// 1-based position in the output list.
    pub rank: usize,
    /// Always non-empty, derived by the contact resolver.
    pub apply_email: String,
}

/// The single global result slot: last completed ranking plus its timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultSet {
    pub updated_at: Option<DateTime<Utc>>,
    pub results: Vec<RankedJob>,
}

/// Coarse partition of the job pool applied before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Br,
    Int,
    #[default]
    Both,
}

impl Region {
    pub fn includes_br(self) -> bool {
        matches!(self, Region::Br | Region::Both)
    }

    pub fn includes_int(self) -> bool {
        matches!(self, Region::Int | Region::Both)
    }
}
