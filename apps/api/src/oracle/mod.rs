/// Scoring oracle — the single point of entry for ranking calls to the
/// Gemini API.
///
/// ARCHITECTURAL RULE: no other module may call the Gemini API directly.
/// The matching engine talks to the `ScoringOracle` trait, never to HTTP.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "models/gemini-flash-lite-latest";
const MAX_RETRIES: u32 = 3;
/// Bound on a single oracle call. A timed-out call is treated like any
/// other oracle failure by the engine (deterministic fallback).
const CALL_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("oracle returned empty content")]
    EmptyContent,

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

/// One scored posting as returned by the oracle, prior to reconciliation
/// against the source pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub title: String,
    pub company: String,
    /// Raw oracle score; clamped to 0..=100 during reconciliation.
    pub score: i64,
    pub reason: String,
}

/// Call contract of the external ranking service: one prompt in, an ordered
/// list of scored `(title, company)` items out. Implemented by the Gemini
/// transport in production and by stubs in engine/pipeline tests.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    async fn rank(&self, prompt: &str) -> Result<Vec<ScoredItem>, OracleError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini-backed oracle. Wraps the `generateContent` REST endpoint with a
/// bounded timeout and exponential-backoff retry on 429/5xx.
#[derive(Clone)]
pub struct GeminiOracle {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiOracle {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(CALL_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Raw text completion. Retries on 429 and 5xx with exponential backoff.
    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model);
        let request_body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let mut last_error: Option<OracleError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "oracle call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(OracleError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("oracle API returned {}: {}", status, body);
                last_error = Some(OracleError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(OracleError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let generated: GenerateResponse = response.json().await?;

            let text = generated
                .candidates
                .into_iter()
                .find_map(|c| {
                    c.content
                        .and_then(|content| content.parts.into_iter().find_map(|p| p.text))
                })
                .ok_or(OracleError::EmptyContent)?;

            debug!("oracle call succeeded ({} chars)", text.len());
            return Ok(text);
        }

        Err(last_error.unwrap_or(OracleError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl ScoringOracle for GeminiOracle {
    async fn rank(&self, prompt: &str) -> Result<Vec<ScoredItem>, OracleError> {
        let text = self.generate(prompt).await?;
        let text = strip_json_fences(&text);
        serde_json::from_str(text).map_err(OracleError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from oracle output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
