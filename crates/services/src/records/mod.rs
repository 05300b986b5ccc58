pub mod airtable;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use speakcheck_models::StudentIdentity;
use thiserror::Error;

pub use airtable::AirtableClient;

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("record store transport failure: {0}")]
    Transport(String),
    #[error("record store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("malformed record store response: {0}")]
    Malformed(String),
}

/// A completed recording to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecording {
    pub student_id: String,
    pub question_id: String,
    /// 1-based position of the question in the session.
    pub question_number: u32,
    pub video_url: String,
}

/// Spreadsheet-backed store of participants and recordings.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Returns the created record id.
    async fn create_recording(&self, recording: &NewRecording) -> Result<String, RecordStoreError>;

    /// Exact-match lookup, first match only. An unknown id is `Ok(None)`.
    async fn lookup_student(&self, student_id: &str) -> Result<Option<StudentIdentity>, RecordStoreError>;
}
