use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use speakcheck_config::AssemblyAiSettings;
use speakcheck_models::SpeechAnalysis;
use tracing::debug;

use super::{EvaluationError, SpeechBackend, TranscriptStatus};

#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
    language_detection: bool,
    speech_threshold: f64,
    format_text: bool,
    auto_highlights: bool,
    content_safety: bool,
    speech_analytics: bool,
}

impl<'a> TranscriptRequest<'a> {
    fn with_analytics(audio_url: &'a str) -> Self {
        Self {
            audio_url,
            language_detection: true,
            speech_threshold: 0.2,
            format_text: true,
            auto_highlights: true,
            content_safety: true,
            speech_analytics: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    status: String,
    error: Option<String>,
}

/// AssemblyAI v2 transcript API.
pub struct AssemblyAiClient {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
}

impl AssemblyAiClient {
    pub fn new(settings: &AssemblyAiSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn transcript_url(&self) -> String {
        format!("{}/v2/transcript", self.api_url)
    }
}

#[async_trait]
impl SpeechBackend for AssemblyAiClient {
    async fn submit(&self, audio_url: &str) -> Result<String, EvaluationError> {
        let resp = self
            .client
            .post(self.transcript_url())
            .header("Authorization", &self.api_key)
            .json(&TranscriptRequest::with_analytics(audio_url))
            .send()
            .await
            .map_err(|e| EvaluationError::Submit(e.to_string()))?;

        let status = resp.status();
        let body: SubmitResponse = resp
            .json()
            .await
            .map_err(|e| EvaluationError::Submit(e.to_string()))?;

        if !status.is_success() {
            return Err(EvaluationError::Submit(
                body.error.unwrap_or_else(|| format!("HTTP {status}")),
            ));
        }

        body.id
            .ok_or_else(|| EvaluationError::Malformed("transcript id missing".to_string()))
    }

    async fn status(&self, job_id: &str) -> Result<TranscriptStatus, EvaluationError> {
        let resp = self
            .client
            .get(format!("{}/{}", self.transcript_url(), job_id))
            .header("Authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| EvaluationError::Poll(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(EvaluationError::Poll(format!("HTTP {}", resp.status())));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| EvaluationError::Poll(e.to_string()))?;
        let envelope: StatusEnvelope = serde_json::from_value(body.clone())
            .map_err(|e| EvaluationError::Malformed(e.to_string()))?;

        debug!(%job_id, status = %envelope.status, "Poll response");

        let status = match envelope.status.as_str() {
            "completed" => {
                let analysis: SpeechAnalysis = serde_json::from_value(body)
                    .map_err(|e| EvaluationError::Malformed(e.to_string()))?;
                TranscriptStatus::Completed(Box::new(analysis))
            }
            "error" => TranscriptStatus::Error(
                envelope
                    .error
                    .unwrap_or_else(|| "unknown transcription error".to_string()),
            ),
            "queued" => TranscriptStatus::Queued,
            _ => TranscriptStatus::Processing,
        };
        Ok(status)
    }

    fn name(&self) -> &str {
        "assemblyai"
    }
}
