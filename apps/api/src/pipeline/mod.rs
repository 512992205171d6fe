//! Search pipeline — one isolated task per request that runs the matching
//! stages sequentially and narrates its own progress onto an mpsc channel.
//! The transport layer consumes the channel independently, so cancellation
//! needs no special-casing inside the algorithm: a failed send means the
//! consumer is gone and the producer stops at its next emit.

pub mod handlers;
mod stage;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::catalog::JobCatalog;
use crate::matching::engine::MatchingEngine;
use crate::models::job::{JobPosting, RankedJob, Region};
use crate::models::preferences::PreferenceSet;
use crate::models::profile::CandidateProfile;
use crate::store::results::ResultCache;

pub use stage::{Stage, StageTracker};

/// Base pacing unit between narration beats. UX only, not
/// correctness-bearing; tests run with `Duration::ZERO`.
const PACE_UNIT: Duration = Duration::from_millis(100);

/// Everything a search request carries into the pipeline.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub region: Region,
    pub max_results: usize,
    pub preferences: Option<PreferenceSet>,
}

/// Consumer went away; stop producing.
struct Disconnected;

struct Narrator {
    tx: mpsc::Sender<String>,
}

impl Narrator {
    async fn say(&self, message: impl Into<String>) -> Result<(), Disconnected> {
        self.tx.send(message.into()).await.map_err(|_| Disconnected)
    }
}

pub struct SearchPipeline {
    profile: Option<CandidateProfile>,
    engine: Option<MatchingEngine>,
    catalog: Arc<JobCatalog>,
    results: Arc<ResultCache>,
    request: SearchRequest,
    pace_unit: Duration,
}

impl SearchPipeline {
    pub fn new(
        profile: Option<CandidateProfile>,
        engine: Option<MatchingEngine>,
        catalog: Arc<JobCatalog>,
        results: Arc<ResultCache>,
        request: SearchRequest,
    ) -> Self {
        Self {
            profile,
            engine,
            catalog,
            results,
            request,
            pace_unit: PACE_UNIT,
        }
    }

    /// Overrides the pacing unit. Tests pass `Duration::ZERO`.
    pub fn with_pacing(mut self, pace_unit: Duration) -> Self {
        self.pace_unit = pace_unit;
        self
    }

    /// Runs the pipeline to completion, publishing narration on `tx`.
    /// Never panics and never errors outward: every terminal condition
    /// (success or failure) emits its marker event, and a disconnected
    /// consumer simply stops production.
    pub async fn run(self, tx: mpsc::Sender<String>) {
        let search_id = Uuid::new_v4();
        let span = tracing::info_span!("job_search", %search_id);
        async move {
            if self.execute(&Narrator { tx }).await.is_err() {
                debug!("consumer disconnected, narration halted");
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(self, narrator: &Narrator) -> Result<(), Disconnected> {
        let SearchPipeline {
            profile,
            engine,
            catalog,
            results,
            request,
            pace_unit,
        } = self;
        let mut stage = StageTracker::new();

        narrator.say("[INICIANDO] Analisando seu perfil...\n").await?;
        pace(pace_unit, 2).await;

        let Some(engine) = engine else {
            stage.fail();
            warn!("search refused: scoring oracle not configured");
            narrator
                .say("[ERRO] Busca inteligente nao disponivel. Configure a chave da IA.\n")
                .await?;
            return Ok(());
        };

        stage.advance(); // ProfileCheck
        let Some(profile) = profile else {
            stage.fail();
            info!("search refused: no candidate profile");
            narrator
                .say("[ERRO] Perfil nao encontrado. Faca upload do CV primeiro.\n")
                .await?;
            return Ok(());
        };

        narrator
            .say(format!(
                "[PERFIL] {} - {} ({} anos)\n",
                profile.name, profile.title, profile.experience_years
            ))
            .await?;
        narrator
            .say(format!("[SKILLS] {}\n\n", profile.skills_summary(8)))
            .await?;
        pace(pace_unit, 4).await;

        if let Some(prefs) = request.preferences.as_ref().filter(|p| !p.is_empty()) {
            narrator
                .say("[PREFERENCIAS] Aplicando orientacoes para a IA...\n")
                .await?;
            for line in prefs.hint_lines() {
                narrator.say(format!("{line}\n")).await?;
            }
            narrator.say("\n").await?;
            pace(pace_unit, 3).await;
        }

        stage.advance(); // RegionCollect
        let region = request.region;
        narrator
            .say("[BUSCANDO] Coletando vagas brasileiras...\n")
            .await?;
        let jobs_br: &[JobPosting] = if region.includes_br() {
            catalog.br()
        } else {
            &[]
        };
        pace(pace_unit, 4).await;
        narrator
            .say(format!(
                "[OK] {} vagas encontradas no Brasil\n\n",
                jobs_br.len()
            ))
            .await?;
        pace(pace_unit, 2).await;

        narrator
            .say("[BUSCANDO] Coletando vagas internacionais...\n")
            .await?;
        let jobs_int: &[JobPosting] = if region.includes_int() {
            catalog.int()
        } else {
            &[]
        };
        pace(pace_unit, 4).await;
        narrator
            .say(format!(
                "[OK] {} vagas encontradas internacionalmente\n\n",
                jobs_int.len()
            ))
            .await?;
        pace(pace_unit, 2).await;

        let pool: Vec<JobPosting> = jobs_br.iter().chain(jobs_int).cloned().collect();

        stage.advance(); // Scoring
        narrator
            .say(format!(
                "[PROCESSANDO] Analisando {} vagas com IA...\n",
                pool.len()
            ))
            .await?;
        pace(pace_unit, 4).await;
        narrator
            .say("[PENSAMENTO] Analisando match com seu perfil...\n")
            .await?;

        let preferences = request.preferences.as_ref();
        let ranked = engine
            .rank(&profile, &pool, preferences, request.max_results)
            .await;

        stage.advance(); // Enriching
        let stored = results.store(ranked).await;

        narrator
            .say(format!(
                "\n[RESULTADO] {} vagas selecionadas como principais:\n\n",
                stored.results.len()
            ))
            .await?;
        narrator.say(format!("{}\n\n", "=".repeat(80))).await?;
        pace(pace_unit, 4).await;

        for job in &stored.results {
            narrator.say(render_job(job)).await?;
            pace(pace_unit, 1).await;
        }

        narrator.say(format!("{}\n", "=".repeat(80))).await?;

        stage.advance(); // Done
        narrator
            .say(format!(
                "\n[CONCLUIDO] Busca finalizada! {} vagas identificadas.\n",
                stored.results.len()
            ))
            .await?;
        debug_assert!(stage.current().is_terminal());
        Ok(())
    }
}

async fn pace(unit: Duration, units: u32) {
    if !unit.is_zero() {
        tokio::time::sleep(unit * units).await;
    }
}

fn render_job(job: &RankedJob) -> String {
    format!(
        "[{}] {}\n    Empresa: {}\n    Localizacao: {}\n    Score: {}/100\n    Motivo: {}\n    URL: {}\n    Email: {}\n    Publicada: {}\n\n",
        job.rank,
        job.posting.title,
        job.posting.company,
        job.posting.location,
        job.score,
        job.reason,
        job.posting.url.as_deref().unwrap_or("-"),
        job.apply_email,
        job.posting.posted,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::oracle::{OracleError, ScoredItem, ScoringOracle};

    struct StubOracle(Result<Vec<ScoredItem>, ()>);

    #[async_trait]
    impl ScoringOracle for StubOracle {
        async fn rank(&self, _prompt: &str) -> Result<Vec<ScoredItem>, OracleError> {
            match &self.0 {
                Ok(items) => Ok(items.clone()),
                Err(()) => Err(OracleError::EmptyContent),
            }
        }
    }

    fn profile() -> CandidateProfile {
        CandidateProfile {
            name: "Ana Silva".into(),
            title: "Backend Developer".into(),
            skills: vec!["Python".into(), "Rust".into()],
            experience_years: 6,
            ..CandidateProfile::default()
        }
    }

    fn request(region: Region) -> SearchRequest {
        SearchRequest {
            region,
            max_results: 10,
            preferences: None,
        }
    }

    struct Fixture {
        catalog: Arc<JobCatalog>,
        results: Arc<ResultCache>,
        _dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            Self {
                catalog: Arc::new(JobCatalog::default()),
                results: Arc::new(ResultCache::open(dir.path())),
                _dir: dir,
            }
        }

        fn pipeline(
            &self,
            profile: Option<CandidateProfile>,
            oracle: Option<StubOracle>,
            request: SearchRequest,
        ) -> SearchPipeline {
            let engine =
                oracle.map(|o| MatchingEngine::new(Arc::new(o) as Arc<dyn ScoringOracle>));
            SearchPipeline::new(
                profile,
                engine,
                Arc::clone(&self.catalog),
                Arc::clone(&self.results),
                request,
            )
            .with_pacing(Duration::ZERO)
        }
    }

    async fn collect(pipeline: SearchPipeline) -> Vec<String> {
        let (tx, mut rx) = mpsc::channel(64);
        let task = tokio::spawn(pipeline.run(tx));
        let mut messages = Vec::new();
        while let Some(message) = rx.recv().await {
            messages.push(message);
        }
        task.await.unwrap();
        messages
    }

    fn position(messages: &[String], tag: &str) -> usize {
        messages
            .iter()
            .position(|m| m.contains(tag))
            .unwrap_or_else(|| panic!("missing {tag} in narration"))
    }

    #[tokio::test]
    async fn narration_arrives_in_stage_order_with_terminal_marker() {
        let fixture = Fixture::new();
        let pipeline = fixture.pipeline(
            Some(profile()),
            Some(StubOracle(Err(()))),
            request(Region::Both),
        );
        let messages = collect(pipeline).await;

        let order = [
            "[INICIANDO]",
            "[PERFIL]",
            "[SKILLS]",
            "[BUSCANDO]",
            "[PROCESSANDO]",
            "[PENSAMENTO]",
            "[RESULTADO]",
            "[CONCLUIDO]",
        ];
        let positions: Vec<usize> = order.iter().map(|tag| position(&messages, tag)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(messages.last().unwrap().contains("[CONCLUIDO]"));
    }

    #[tokio::test]
    async fn completed_search_overwrites_result_cache() {
        let fixture = Fixture::new();
        let pipeline = fixture.pipeline(
            Some(profile()),
            Some(StubOracle(Err(()))),
            request(Region::Both),
        );
        collect(pipeline).await;

        let set = fixture.results.read().await;
        assert!(set.updated_at.is_some());
        // Oracle failed: deterministic fallback of 5 postings in pool order.
        assert_eq!(set.results.len(), 5);
        assert!(set.results.iter().all(|j| j.score == 50));
        assert_eq!(set.results[0].posting.company, "Nubank");
    }

    #[tokio::test]
    async fn br_region_only_considers_br_postings() {
        let fixture = Fixture::new();
        let pipeline = fixture.pipeline(
            Some(profile()),
            Some(StubOracle(Err(()))),
            request(Region::Br),
        );
        let messages = collect(pipeline).await;

        assert!(messages
            .iter()
            .any(|m| m.contains("[OK] 5 vagas encontradas no Brasil")));
        assert!(messages
            .iter()
            .any(|m| m.contains("[OK] 0 vagas encontradas internacionalmente")));

        let set = fixture.results.read().await;
        assert!(set.results.len() <= 5);
        let br_companies = ["Nubank", "Stone Co", "Creditas", "BTG Pactual", "Rappi"];
        assert!(set
            .results
            .iter()
            .all(|j| br_companies.contains(&j.posting.company.as_str())));
    }

    #[tokio::test]
    async fn missing_profile_emits_error_then_ends() {
        let fixture = Fixture::new();
        let pipeline = fixture.pipeline(None, Some(StubOracle(Err(()))), request(Region::Both));
        let messages = collect(pipeline).await;

        assert!(messages.last().unwrap().contains("[ERRO] Perfil nao encontrado"));
        assert!(fixture.results.read().await.updated_at.is_none());
    }

    #[tokio::test]
    async fn unconfigured_oracle_emits_error_then_ends() {
        let fixture = Fixture::new();
        let pipeline = fixture.pipeline(Some(profile()), None, request(Region::Both));
        let messages = collect(pipeline).await;

        assert!(messages
            .last()
            .unwrap()
            .contains("[ERRO] Busca inteligente nao disponivel"));
    }

    #[tokio::test]
    async fn preference_hints_are_narrated() {
        let fixture = Fixture::new();
        let mut req = request(Region::Both);
        req.preferences = Some(PreferenceSet {
            keywords: vec!["rust".into()],
            ..PreferenceSet::default()
        });
        let pipeline = fixture.pipeline(Some(profile()), Some(StubOracle(Err(()))), req);
        let messages = collect(pipeline).await;

        let prefs_at = position(&messages, "[PREFERENCIAS]");
        assert!(messages[prefs_at + 1].contains("- Keywords: rust"));
        assert!(prefs_at < position(&messages, "[BUSCANDO]"));
    }

    #[tokio::test]
    async fn dropped_consumer_halts_production() {
        let fixture = Fixture::new();
        let pipeline = fixture.pipeline(
            Some(profile()),
            Some(StubOracle(Err(()))),
            request(Region::Both),
        );
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        // Must return promptly without panicking or touching the cache.
        pipeline.run(tx).await;
        assert!(fixture.results.read().await.updated_at.is_none());
    }
}
