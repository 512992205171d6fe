//! Streaming search endpoints. Both variants deliver the same narration
//! sequence: a push (SSE/EventSource) stream on GET and a chunked
//! `text/event-stream` body on POST for consumers that cannot hold a
//! persistent EventSource connection. Either way the last content event
//! carries the terminal marker and an explicit `end` event closes the
//! stream, so consumers never block awaiting completion.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderName};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

use crate::errors::AppError;
use crate::matching::engine::{MatchingEngine, MAX_DISPLAY_CAP};
use crate::models::job::Region;
use crate::models::preferences::PreferenceSet;
use crate::pipeline::{SearchPipeline, SearchRequest};
use crate::state::AppState;

const DEFAULT_MAX_RESULTS: usize = 10;
/// Buffered narration events before the producer awaits the consumer.
const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub region: Option<Region>,
    pub max_results: Option<usize>,
    /// Base64-encoded JSON preference bundle, assembled by the UI.
    pub config: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchBody {
    pub region: Option<Region>,
    pub max_results: Option<usize>,
    pub preferences: Option<PreferenceSet>,
}

/// GET /api/jobs/search — push variant (SSE).
pub async fn handle_search_sse(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let request = SearchRequest {
        region: params.region.unwrap_or_default(),
        max_results: clamp_max_results(params.max_results),
        preferences: params
            .config
            .as_deref()
            .and_then(PreferenceSet::decode_bundle),
    };

    let rx = start_search(&state, request).await;
    let stream = ReceiverStream::new(rx)
        .map(|message| Event::default().data(json!({ "message": message }).to_string()))
        .chain(tokio_stream::once(Event::default().event("end").data("{}")))
        .map(Ok::<_, Infallible>);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// POST /api/jobs/search — pull variant: the same event lines over a
/// chunked response body. Consumers read `data:` lines in arrival order and
/// stop on the `end` event (or the terminal marker, whichever they see).
pub async fn handle_search_poll(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<SearchBody>>,
) -> Response {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    // Plain-JSON clients get conventional status codes for the two
    // refuse-to-start conditions; streaming clients get them as narration.
    if !accepts_event_stream(&headers) {
        if state.oracle.is_none() {
            return AppError::Unavailable("Busca inteligente nao disponivel".into())
                .into_response();
        }
        if state.profiles.load().await.is_none() {
            return AppError::NotFound("Perfil nao encontrado".into()).into_response();
        }
    }

    let request = SearchRequest {
        region: body.region.unwrap_or_default(),
        max_results: clamp_max_results(body.max_results),
        preferences: body.preferences,
    };

    let rx = start_search(&state, request).await;
    let stream = ReceiverStream::new(rx)
        .map(|message| format!("data: {}\n\n", json!({ "message": message })))
        .chain(tokio_stream::once("event: end\ndata: {}\n\n".to_string()))
        .map(Ok::<_, Infallible>);

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (HeaderName::from_static("x-accel-buffering"), "no"),
        ],
        Body::from_stream(stream),
    )
        .into_response()
}

/// Snapshots request-scoped state and spawns the pipeline task. The
/// returned receiver closes once the pipeline finishes or is abandoned.
async fn start_search(state: &AppState, request: SearchRequest) -> mpsc::Receiver<String> {
    if let Some(prefs) = request.preferences.as_ref().filter(|p| !p.is_empty()) {
        state.site_state.record_search(prefs).await;
    }

    let profile = state.profiles.load().await;
    let engine = state.oracle.clone().map(MatchingEngine::new);
    let pipeline = SearchPipeline::new(
        profile,
        engine,
        Arc::clone(&state.catalog),
        Arc::clone(&state.results),
        request,
    );

    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(pipeline.run(tx));
    rx
}

fn clamp_max_results(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_MAX_RESULTS).clamp(1, MAX_DISPLAY_CAP)
}

fn accepts_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/event-stream"))
}
