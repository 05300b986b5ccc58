use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use speakcheck_services::upload::decode_data_url;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Base64 `data:` URL as produced by the browser's `FileReader`.
    pub video_blob: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub video_id: String,
}

pub async fn upload(
    State(state): State<AppState>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let Json(body) = payload?;
    let (Some(blob), Some(file_name)) = (
        body.video_blob.filter(|b| !b.is_empty()),
        body.file_name.filter(|n| !n.trim().is_empty()),
    ) else {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    };

    let clip = decode_data_url(&blob)?;
    let video = state.uploads.upload(&clip, &file_name).await?;

    Ok(Json(UploadResponse {
        url: video.playable_url,
        video_id: video.external_id,
    }))
}
