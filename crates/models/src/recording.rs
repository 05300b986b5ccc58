use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A captured response that has been uploaded to the video host.
///
/// Only created after a successful upload; holds a reference to the hosted
/// video, never the media bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub question_id: String,
    #[serde(alias = "vimeoUrl")]
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
}

impl Recording {
    pub fn new(question_id: impl Into<String>, video_url: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            video_url: video_url.into(),
            external_id: None,
            recorded_at: Utc::now(),
        }
    }
}
