pub mod vimeo;

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub use vimeo::VimeoClient;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("video host rejected credentials: {0}")]
    Authentication(String),
    #[error("video upload transport failure: {0}")]
    Transport(String),
    #[error("video host response lacked a playable url: {0}")]
    MalformedResponse(String),
    #[error("invalid clip: {0}")]
    InvalidClip(String),
}

/// A hosted video. `playable_url` is the player embed URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedVideo {
    pub playable_url: String,
    pub external_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMetadata {
    pub name: String,
    pub description: String,
    /// Visibility, e.g. `unlisted`.
    pub privacy: String,
    pub folder_uri: Option<String>,
}

/// External video hosting collaborator.
#[async_trait]
pub trait VideoHost: Send + Sync + 'static {
    /// Checks the configured credentials before any upload is attempted.
    async fn verify_identity(&self) -> Result<(), UploadError>;

    /// Creates exactly one hosted video from `clip`.
    async fn upload(&self, clip: &[u8], metadata: &VideoMetadata) -> Result<UploadedVideo, UploadError>;
}

/// Decodes a browser `data:` URL (`data:video/webm;base64,....`).
///
/// Everything after the first comma is treated as base64; a bare base64
/// string is accepted as well.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, UploadError> {
    let payload = match data_url.split_once(',') {
        Some((_, payload)) => payload,
        None => data_url,
    };
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| UploadError::InvalidClip(e.to_string()))?;
    if bytes.is_empty() {
        return Err(UploadError::InvalidClip("clip is empty".to_string()));
    }
    Ok(bytes)
}

/// One upload call: identity check, then a single hosted asset.
///
/// Callers must not invoke this twice for the same recording; the recording
/// state machine only uploads from its awaiting-upload state.
#[derive(Clone)]
pub struct UploadService {
    host: Arc<dyn VideoHost>,
    folder_id: Option<String>,
}

impl UploadService {
    pub fn new(host: Arc<dyn VideoHost>, folder_id: Option<String>) -> Self {
        Self { host, folder_id }
    }

    pub fn metadata_for(&self, name: &str) -> VideoMetadata {
        VideoMetadata {
            name: name.to_string(),
            description: "Test recording response".to_string(),
            privacy: "unlisted".to_string(),
            folder_uri: self
                .folder_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .map(|id| format!("/folders/{id}")),
        }
    }

    pub async fn upload(&self, clip: &[u8], name: &str) -> Result<UploadedVideo, UploadError> {
        if clip.is_empty() {
            return Err(UploadError::InvalidClip("clip is empty".to_string()));
        }

        if let Err(e) = self.host.verify_identity().await {
            warn!(%e, "Video host identity check failed");
            return Err(e);
        }

        let video = self.host.upload(clip, &self.metadata_for(name)).await?;
        if video.playable_url.trim().is_empty() {
            return Err(UploadError::MalformedResponse(format!(
                "video {} has no player url",
                video.external_id
            )));
        }

        info!(
            name,
            bytes = clip.len(),
            external_id = %video.external_id,
            "Clip uploaded"
        );
        Ok(video)
    }
}
