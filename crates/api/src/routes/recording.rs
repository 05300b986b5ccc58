use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use speakcheck_services::records::NewRecording;
use tracing::info;
use validator::Validate;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordingRequest {
    pub student_id: Option<String>,
    pub question_id: Option<String>,
    #[validate(url)]
    pub video_url: Option<String>,
    #[validate(range(min = 1))]
    pub question_number: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CreateRecordingResponse {
    pub success: bool,
    pub id: String,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

impl CreateRecordingRequest {
    fn has_required_fields(&self) -> bool {
        !is_blank(&self.student_id)
            && !is_blank(&self.question_id)
            && !is_blank(&self.video_url)
            && self.question_number.is_some()
    }
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateRecordingRequest>, JsonRejection>,
) -> Result<Json<CreateRecordingResponse>, ApiError> {
    let Json(body) = payload?;
    if !body.has_required_fields() {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let CreateRecordingRequest {
        student_id: Some(student_id),
        question_id: Some(question_id),
        video_url: Some(video_url),
        question_number: Some(question_number),
    } = body
    else {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    };

    let recording = NewRecording {
        student_id,
        question_id,
        question_number,
        video_url,
    };
    let id = state
        .records
        .create_recording(&recording)
        .await
        .map_err(ApiError::record_write)?;

    info!(record_id = %id, student_id = %recording.student_id, "Recording stored");
    Ok(Json(CreateRecordingResponse { success: true, id }))
}
