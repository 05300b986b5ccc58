use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use speakcheck_services::evaluation::EvaluationError;
use speakcheck_services::records::RecordStoreError;
use speakcheck_services::upload::UploadError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Internal(String),
    Validation(String),
    /// A collaborator rejected the request; its status is passed through.
    Upstream {
        status: StatusCode,
        message: String,
        details: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            ApiError::Internal(msg) => write!(f, "Internal error: {msg}"),
            ApiError::Validation(msg) => write!(f, "Validation: {msg}"),
            ApiError::Upstream { status, message, details } => {
                write!(f, "Upstream {status}: {message} ({details})")
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, None),
            ApiError::Upstream {
                status,
                message,
                details,
            } => (status, message, Some(details)),
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<EvaluationError> for ApiError {
    fn from(err: EvaluationError) -> Self {
        tracing::error!(%err, "Evaluation failed");
        ApiError::Internal("Failed to evaluate speech".to_string())
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        tracing::error!(%err, "Upload failed");
        match err {
            UploadError::Authentication(_) => ApiError::Unauthorized(
                "Failed to authenticate with Vimeo. Please check credentials.".to_string(),
            ),
            UploadError::InvalidClip(_) => ApiError::BadRequest("Invalid video data".to_string()),
            UploadError::MalformedResponse(_) => {
                ApiError::Internal("Invalid response from Vimeo".to_string())
            }
            UploadError::Transport(_) => ApiError::Internal("Failed to upload video".to_string()),
        }
    }
}

impl ApiError {
    /// Maps a failed record write, passing a rejection's status through.
    pub fn record_write(err: RecordStoreError) -> Self {
        tracing::error!(%err, "Failed to create record");
        match err {
            RecordStoreError::Rejected { status, message } => ApiError::Upstream {
                status: StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::UNPROCESSABLE_ENTITY),
                message: "Failed to create record in Airtable".to_string(),
                details: message,
            },
            _ => ApiError::Internal("Failed to save recording".to_string()),
        }
    }

    pub fn student_lookup(err: RecordStoreError) -> Self {
        tracing::error!(%err, "Student lookup failed");
        ApiError::Internal("Failed to fetch student".to_string())
    }
}
