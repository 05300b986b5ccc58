use axum::{Json, extract::rejection::JsonRejection};
use serde::Deserialize;
use speakcheck_services::session::{EvaluatedRecording, SessionReport, report};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ResultsRequest {
    #[serde(default)]
    pub recordings: Vec<EvaluatedRecording>,
}

pub async fn summarize(
    payload: Result<Json<ResultsRequest>, JsonRejection>,
) -> Result<Json<SessionReport>, ApiError> {
    let Json(body) = payload?;
    Ok(Json(report(&body.recordings)))
}
