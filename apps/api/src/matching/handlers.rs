use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::matching::keywords::suggest_keywords;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub keywords: Vec<String>,
}

/// GET /api/jobs/suggest-keywords
pub async fn handle_suggest_keywords(
    State(state): State<AppState>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let profile = state
        .profiles
        .load()
        .await
        .ok_or_else(|| AppError::NotFound("Perfil nao encontrado".into()))?;
    Ok(Json(KeywordsResponse {
        keywords: suggest_keywords(&profile),
    }))
}
