//! One student's attempt across the selected questions.

pub mod context;
pub mod controller;
pub mod devices;
pub mod machine;
pub mod results;

use serde::Serialize;
use speakcheck_models::{Question, Recording};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::questions::{QuestionBank, QuestionBankError};

pub use context::{ContextError, FileIdentityStore, IdentityStore, MemoryIdentityStore, StudentContext};
pub use controller::SessionController;
pub use devices::{Clip, DeviceError, MediaDevices, MediaStream};
pub use machine::{MachineError, RecordingMachine, RecordingPhase, RecordingState};
pub use results::{EvaluatedRecording, QuestionFeedback, SessionReport, aggregate, report};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no student is signed in")]
    NoStudent,
    #[error("session has no questions")]
    NoQuestions,
    #[error("recording for {got} does not match current question {expected}")]
    QuestionMismatch { expected: String, got: String },
    #[error("session already finished")]
    AlreadyFinished,
    #[error("session has {remaining} unanswered questions")]
    Incomplete { remaining: usize },
    #[error(transparent)]
    EmptyCategory(#[from] QuestionBankError),
    #[error(transparent)]
    Machine(#[from] MachineError),
    #[error(transparent)]
    Context(#[from] ContextError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    InProgress { index: usize },
    Finished,
}

#[derive(Debug, Clone)]
pub struct TestSession {
    id: Uuid,
    student_id: String,
    questions: Vec<Question>,
    current_index: usize,
    recordings: Vec<Recording>,
}

impl TestSession {
    /// Draws a fresh selection for the signed-in student.
    pub fn start(context: &StudentContext, bank: &QuestionBank) -> Result<Self, SessionError> {
        let student_id = context.student_id().ok_or(SessionError::NoStudent)?;
        let questions = bank.select_questions()?;
        Self::with_questions(student_id, questions)
    }

    pub fn with_questions(student_id: impl Into<String>, questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        let session = Self {
            id: Uuid::new_v4(),
            student_id: student_id.into(),
            questions,
            current_index: 0,
            recordings: Vec::new(),
        };
        info!(
            session_id = %session.id,
            student_id = %session.student_id,
            questions = session.questions.len(),
            "Session started"
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// 1-based position of the current question.
    pub fn question_number(&self) -> u32 {
        self.current_index as u32 + 1
    }

    /// Hosted video name for the current question.
    pub fn clip_name(&self) -> String {
        format!("{}_question_{}", self.student_id, self.question_number())
    }

    /// Appends the current question's recording and advances.
    pub fn record(&mut self, recording: Recording) -> Result<SessionState, SessionError> {
        let expected = self.current_question().ok_or(SessionError::AlreadyFinished)?;
        if expected.id != recording.question_id {
            return Err(SessionError::QuestionMismatch {
                expected: expected.id.clone(),
                got: recording.question_id,
            });
        }

        self.recordings.push(recording);
        self.current_index += 1;
        let state = self.state();
        if state == SessionState::Finished {
            info!(session_id = %self.id, recordings = self.recordings.len(), "Session finished");
        }
        Ok(state)
    }

    pub fn state(&self) -> SessionState {
        if self.current_index >= self.questions.len() {
            SessionState::Finished
        } else {
            SessionState::InProgress {
                index: self.current_index,
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == SessionState::Finished
    }

    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }
}
