pub mod assembly_ai;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use speakcheck_config::EvaluationSettings;
use speakcheck_models::{EvaluationResult, SpeechAnalysis};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::scoring::{self, ScoringError};

pub use assembly_ai::AssemblyAiClient;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("failed to submit audio for transcription: {0}")]
    Submit(String),
    #[error("failed to poll transcription status: {0}")]
    Poll(String),
    #[error("transcription failed: {0}")]
    Failed(String),
    #[error("transcription timed out after {attempts} attempts")]
    Timeout { attempts: u32 },
    #[error("malformed transcription response: {0}")]
    Malformed(String),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Job status reported by the speech collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed(Box<SpeechAnalysis>),
    Error(String),
}

/// Transcription service that accepts an audio URL and is polled for the
/// result.
#[async_trait]
pub trait SpeechBackend: Send + Sync + 'static {
    /// Submits an audio URL with acoustic analytics enabled. Returns the job id.
    async fn submit(&self, audio_url: &str) -> Result<String, EvaluationError>;

    async fn status(&self, job_id: &str) -> Result<TranscriptStatus, EvaluationError>;

    fn name(&self) -> &str;
}

/// Suspends the poll loop between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync + 'static {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 30,
        }
    }
}

impl From<&EvaluationSettings> for PollPolicy {
    fn from(settings: &EvaluationSettings) -> Self {
        Self {
            interval: Duration::from_millis(settings.poll_interval_ms),
            max_attempts: settings.max_attempts,
        }
    }
}

/// Submit, poll, then score. Any failure aborts the whole evaluation.
pub struct EvaluationService {
    backend: Arc<dyn SpeechBackend>,
    sleeper: Arc<dyn Sleeper>,
    policy: PollPolicy,
}

impl EvaluationService {
    pub fn new(backend: Arc<dyn SpeechBackend>, policy: PollPolicy) -> Self {
        Self::with_sleeper(backend, policy, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(
        backend: Arc<dyn SpeechBackend>,
        policy: PollPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            backend,
            sleeper,
            policy,
        }
    }

    pub async fn evaluate(&self, audio_url: &str) -> Result<EvaluationResult, EvaluationError> {
        info!(audio_url, backend = %self.backend.name(), "Starting evaluation");

        let job_id = self.backend.submit(audio_url).await?;
        info!(%job_id, "Transcription submitted");

        let analysis = self.wait_for_completion(&job_id).await?;
        let result = scoring::score(&analysis)?;

        info!(
            %job_id,
            fluency = result.fluency,
            pronunciation = result.pronunciation,
            intelligibility = result.intelligibility,
            "Evaluation complete"
        );
        Ok(result)
    }

    /// Polls at a fixed interval until the job completes, errors, or the
    /// attempt ceiling is reached.
    pub async fn wait_for_completion(&self, job_id: &str) -> Result<SpeechAnalysis, EvaluationError> {
        for attempt in 1..=self.policy.max_attempts {
            debug!(%job_id, attempt, max = self.policy.max_attempts, "Polling transcription");

            match self.backend.status(job_id).await? {
                TranscriptStatus::Completed(analysis) => return Ok(*analysis),
                TranscriptStatus::Error(reason) => {
                    warn!(%job_id, %reason, "Transcription failed");
                    return Err(EvaluationError::Failed(reason));
                }
                TranscriptStatus::Queued | TranscriptStatus::Processing => {}
            }

            self.sleeper.sleep(self.policy.interval).await;
        }

        warn!(%job_id, attempts = self.policy.max_attempts, "Transcription timed out");
        Err(EvaluationError::Timeout {
            attempts: self.policy.max_attempts,
        })
    }
}
