use async_trait::async_trait;
use serde::Deserialize;
use speakcheck_config::AirtableSettings;
use speakcheck_models::StudentIdentity;
use tracing::{debug, info, warn};

use super::{NewRecording, RecordStore, RecordStoreError};

#[derive(Debug, Deserialize)]
struct RecordList {
    #[serde(default)]
    records: Vec<AirtableRecord>,
}

#[derive(Debug, Deserialize)]
struct AirtableRecord {
    id: String,
    #[serde(default)]
    fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<AirtableError>,
}

/// Airtable reports errors either as a bare string or as an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AirtableError {
    Detailed {
        #[serde(rename = "type")]
        kind: Option<String>,
        message: Option<String>,
    },
    Code(String),
}

impl AirtableError {
    fn describe(self) -> String {
        match self {
            AirtableError::Detailed { kind, message } => message
                .or(kind)
                .unwrap_or_else(|| "unknown error".to_string()),
            AirtableError::Code(code) => code,
        }
    }
}

/// Airtable REST client for the participants and recordings tables.
pub struct AirtableClient {
    api_key: String,
    base_url: String,
    participants_table: String,
    recordings_table: String,
    client: reqwest::Client,
}

impl AirtableClient {
    pub fn new(settings: &AirtableSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            base_url: format!(
                "{}/v0/{}",
                settings.api_url.trim_end_matches('/'),
                settings.base_id
            ),
            participants_table: settings.participants_table.clone(),
            recordings_table: settings.recordings_table.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(table))
    }

    async fn rejection(resp: reqwest::Response) -> RecordStoreError {
        let status = resp.status().as_u16();
        let message = match resp.json::<ErrorEnvelope>().await {
            Ok(ErrorEnvelope { error: Some(err) }) => err.describe(),
            _ => "no message provided".to_string(),
        };
        RecordStoreError::Rejected { status, message }
    }
}

/// Builds `{StudentID} = '<id>'` with the id quoted as a formula string.
pub fn student_formula(student_id: &str) -> String {
    let escaped = student_id.replace('\\', "\\\\").replace('\'', "\\'");
    format!("{{StudentID}} = '{escaped}'")
}

fn field_as_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Array(items) => items.first().and_then(field_as_string),
        _ => None,
    }
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn create_recording(&self, recording: &NewRecording) -> Result<String, RecordStoreError> {
        let body = serde_json::json!({
            "records": [{
                "fields": {
                    "StudentID": [recording.student_id],
                    "QuestionNumber": recording.question_number,
                    "QuestionID": recording.question_id,
                    "VideoURL": recording.video_url,
                }
            }]
        });

        let resp = self
            .client
            .post(self.table_url(&self.recordings_table))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RecordStoreError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let err = Self::rejection(resp).await;
            warn!(%err, student_id = %recording.student_id, "Failed to create recording record");
            return Err(err);
        }

        let created: RecordList = resp
            .json()
            .await
            .map_err(|e| RecordStoreError::Malformed(e.to_string()))?;
        let id = created
            .records
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| RecordStoreError::Malformed("no record returned".to_string()))?;

        info!(record_id = %id, question_id = %recording.question_id, "Recording persisted");
        Ok(id)
    }

    async fn lookup_student(&self, student_id: &str) -> Result<Option<StudentIdentity>, RecordStoreError> {
        let formula = student_formula(student_id);
        let resp = self
            .client
            .get(self.table_url(&self.participants_table))
            .bearer_auth(&self.api_key)
            .query(&[("filterByFormula", formula.as_str()), ("maxRecords", "1")])
            .send()
            .await
            .map_err(|e| RecordStoreError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }

        let list: RecordList = resp
            .json()
            .await
            .map_err(|e| RecordStoreError::Malformed(e.to_string()))?;

        let Some(record) = list.records.into_iter().next() else {
            debug!(student_id, "Student not found");
            return Ok(None);
        };

        let id = record
            .fields
            .get("StudentID")
            .and_then(field_as_string)
            .unwrap_or_else(|| student_id.to_string());
        let first_name = record
            .fields
            .get("First Name")
            .and_then(field_as_string)
            .unwrap_or_default();

        debug!(student_id = %id, record_id = %record.id, "Student resolved");
        Ok(Some(StudentIdentity { id, first_name }))
    }
}
