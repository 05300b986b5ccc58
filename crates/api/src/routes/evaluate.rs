use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use speakcheck_models::EvaluationResult;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub audio_url: Option<String>,
}

/// Transcribes and scores one recording. Blocks until the poll loop ends.
pub async fn evaluate(
    State(state): State<AppState>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<EvaluationResult>, ApiError> {
    let Json(body) = payload?;
    let audio_url = body
        .audio_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Audio URL is required".to_string()))?;

    let result = state.evaluation.evaluate(&audio_url).await?;
    Ok(Json(result))
}
