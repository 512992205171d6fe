//! Matching engine — ranks a posting pool against a profile via the scoring
//! oracle, with a deterministic fallback when the oracle misbehaves.

use std::cmp::Reverse;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::matching::contact::infer_apply_email;
use crate::matching::prompt::build_ranking_prompt;
use crate::models::job::{JobPosting, RankedJob};
use crate::models::preferences::PreferenceSet;
use crate::models::profile::CandidateProfile;
use crate::oracle::{OracleError, ScoredItem, ScoringOracle};

/// Internal ranking ceiling; the caller's display cap truncates further but
/// never expands past this.
pub const MAX_RANKED: usize = 10;
/// Display cap bounds accepted from callers.
pub const MAX_DISPLAY_CAP: usize = 50;
pub const FALLBACK_LEN: usize = 5;
pub const FALLBACK_SCORE: u8 = 50;
pub const FALLBACK_REASON: &str = "Selecao automatica (fallback)";

/// A reconciled posting carrying its original pool position for stable
/// tie-breaking.
struct Scored {
    pool_index: usize,
    posting: JobPosting,
    score: u8,
    reason: String,
}

pub struct MatchingEngine {
    oracle: Arc<dyn ScoringOracle>,
}

impl MatchingEngine {
    pub fn new(oracle: Arc<dyn ScoringOracle>) -> Self {
        Self { oracle }
    }

    /// Ranks `pool` for `profile`. Total function: oracle failure, timeout,
    /// malformed output, and empty reconciliation all degrade to the
    /// deterministic fallback instead of erroring. Output is sorted by score
    /// descending, ties in pool order, at most `min(MAX_RANKED, cap)` items.
    pub async fn rank(
        &self,
        profile: &CandidateProfile,
        pool: &[JobPosting],
        preferences: Option<&PreferenceSet>,
        cap: usize,
    ) -> Vec<RankedJob> {
        let cap = cap.clamp(1, MAX_DISPLAY_CAP);

        let scored = match self.oracle_ranking(profile, pool, preferences).await {
            Ok(scored) if !scored.is_empty() => scored,
            Ok(_) => {
                debug!("oracle returned no reconcilable postings, using fallback");
                fallback_ranking(pool)
            }
            Err(err) => {
                warn!("oracle ranking failed, using fallback: {err}");
                fallback_ranking(pool)
            }
        };

        finalize(scored, cap)
    }

    async fn oracle_ranking(
        &self,
        profile: &CandidateProfile,
        pool: &[JobPosting],
        preferences: Option<&PreferenceSet>,
    ) -> Result<Vec<Scored>, OracleError> {
        let prompt = build_ranking_prompt(profile, pool, preferences);
        let items = self.oracle.rank(&prompt).await?;
        Ok(reconcile(items, pool))
    }
}

/// Matches oracle items back to their source postings by exact
/// `(company, title)` equality. Items the oracle invented or paraphrased
/// beyond recognition are dropped silently.
fn reconcile(items: Vec<ScoredItem>, pool: &[JobPosting]) -> Vec<Scored> {
    items
        .into_iter()
        .filter_map(|item| {
            let (pool_index, posting) = pool
                .iter()
                .enumerate()
                .find(|(_, job)| job.company == item.company && job.title == item.title)?;
            Some(Scored {
                pool_index,
                posting: posting.clone(),
                score: item.score.clamp(0, 100) as u8,
                reason: item.reason,
            })
        })
        .collect()
}

/// Oracle-independent ranking: first postings in pool order with a fixed
/// score and reason.
fn fallback_ranking(pool: &[JobPosting]) -> Vec<Scored> {
    pool.iter()
        .take(FALLBACK_LEN)
        .enumerate()
        .map(|(pool_index, posting)| Scored {
            pool_index,
            posting: posting.clone(),
            score: FALLBACK_SCORE,
            reason: FALLBACK_REASON.to_string(),
        })
        .collect()
}

fn finalize(mut scored: Vec<Scored>, cap: usize) -> Vec<RankedJob> {
    scored.sort_by_key(|s| (Reverse(s.score), s.pool_index));
    scored.truncate(MAX_RANKED.min(cap));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let apply_email = infer_apply_email(&s.posting.company, s.posting.url.as_deref());
            RankedJob {
                posting: s.posting,
                score: s.score,
                reason: s.reason,
                rank: i + 1,
                apply_email,
            }
        })
        .collect()
}
