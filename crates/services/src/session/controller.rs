use std::sync::Arc;

use speakcheck_models::Recording;
use tracing::{info, warn};

use super::machine::{RecordingMachine, RecordingPhase};
use super::{MachineError, MediaDevices, SessionError, SessionState, StudentContext, TestSession};
use crate::records::{NewRecording, RecordStore};
use crate::upload::UploadService;

/// Drives a [`TestSession`] one question at a time.
pub struct SessionController {
    session: TestSession,
    uploads: UploadService,
    records: Arc<dyn RecordStore>,
}

impl SessionController {
    pub fn new(session: TestSession, uploads: UploadService, records: Arc<dyn RecordStore>) -> Self {
        Self {
            session,
            uploads,
            records,
        }
    }

    pub fn session(&self) -> &TestSession {
        &self.session
    }

    /// Starts the recording flow for the current question.
    ///
    /// The previous question's machine must be dropped or torn down first so
    /// its stream is released.
    pub fn begin_question(&self, devices: &mut dyn MediaDevices) -> Result<RecordingMachine, SessionError> {
        let question = self
            .session
            .current_question()
            .cloned()
            .ok_or(SessionError::AlreadyFinished)?;
        Ok(RecordingMachine::start(question, devices))
    }

    /// Uploads the machine's clip and advances the session.
    ///
    /// Persisting to the record store is best effort; a failure there is
    /// logged and the question still counts as completed.
    pub async fn submit(&mut self, machine: &mut RecordingMachine) -> Result<SessionState, SessionError> {
        let expected = self
            .session
            .current_question()
            .ok_or(SessionError::AlreadyFinished)?;
        if expected.id != machine.question().id {
            return Err(SessionError::QuestionMismatch {
                expected: expected.id.clone(),
                got: machine.question().id.clone(),
            });
        }
        if machine.phase() != RecordingPhase::AwaitingUpload {
            return Err(MachineError::InvalidTransition {
                action: "submit",
                phase: machine.phase(),
            }
            .into());
        }

        let name = self.session.clip_name();
        let recording: Recording = machine.upload(&self.uploads, &name).await?.clone();
        self.persist(&recording).await;
        self.session.record(recording)
    }

    async fn persist(&self, recording: &Recording) {
        let new = NewRecording {
            student_id: self.session.student_id().to_string(),
            question_id: recording.question_id.clone(),
            question_number: self.session.question_number(),
            video_url: recording.video_url.clone(),
        };
        match self.records.create_recording(&new).await {
            Ok(record_id) => info!(%record_id, question_number = new.question_number, "Recording saved"),
            Err(e) => warn!(%e, question_id = %new.question_id, "Failed to save recording; continuing"),
        }
    }

    /// Ends a finished session and clears the student context.
    pub fn complete(self, context: &mut StudentContext) -> Result<Vec<Recording>, SessionError> {
        if !self.session.is_finished() {
            return Err(SessionError::Incomplete {
                remaining: self.session.questions().len() - self.session.recordings().len(),
            });
        }
        context.clear()?;
        Ok(self.session.recordings().to_vec())
    }
}
