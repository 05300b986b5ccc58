use axum::{Json, extract::State};
use speakcheck_models::Question;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, serde::Serialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

/// A fresh selection, one prompt per category.
pub async fn select(State(state): State<AppState>) -> Result<Json<QuestionSet>, ApiError> {
    let questions = state.questions.select_questions().map_err(|e| {
        tracing::error!(%e, "Question bank misconfigured");
        ApiError::Internal("Failed to select questions".to_string())
    })?;
    Ok(Json(QuestionSet { questions }))
}
