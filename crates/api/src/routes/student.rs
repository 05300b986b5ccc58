use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use speakcheck_models::StudentIdentity;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub id: Option<String>,
}

pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
) -> Result<Json<StudentIdentity>, ApiError> {
    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Student ID is required".to_string()))?;

    state
        .records
        .lookup_student(&id)
        .await
        .map_err(ApiError::student_lookup)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))
}
