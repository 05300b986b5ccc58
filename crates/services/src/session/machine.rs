//! Per-question recording controller.
//!
//! ```text
//! PreviewingMedia -> Countdown -> Recording -> AwaitingUpload -> Uploading -> Completed
//!        ^                                          ^                |
//!  (devices denied: ErrorAcquiringDevices)          +---- failure ---+
//! ```
//!
//! [`RecordingMachine::teardown`] moves any unfinished question to the
//! terminal `Abandoned` state.
//!
//! Timers advance one second per [`RecordingMachine::tick`]. The machine owns
//! the camera/microphone stream and releases it on completion, on device
//! failure, on teardown and on drop.

use speakcheck_models::{Question, Recording};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::devices::{Clip, DeviceError, MediaDevices, MediaStream};
use crate::upload::{UploadError, UploadService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingState {
    ErrorAcquiringDevices(DeviceError),
    /// Showing the question's timed media asset.
    PreviewingMedia { remaining: u32 },
    Countdown { remaining: u32 },
    Recording { remaining: u32 },
    /// A clip is captured and waits for confirmation.
    AwaitingUpload,
    Uploading,
    Completed,
    /// Torn down before completion; no further transitions.
    Abandoned,
}

/// State without its timer payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingPhase {
    ErrorAcquiringDevices,
    PreviewingMedia,
    Countdown,
    Recording,
    AwaitingUpload,
    Uploading,
    Completed,
    Abandoned,
}

impl RecordingState {
    pub fn phase(&self) -> RecordingPhase {
        match self {
            RecordingState::ErrorAcquiringDevices(_) => RecordingPhase::ErrorAcquiringDevices,
            RecordingState::PreviewingMedia { .. } => RecordingPhase::PreviewingMedia,
            RecordingState::Countdown { .. } => RecordingPhase::Countdown,
            RecordingState::Recording { .. } => RecordingPhase::Recording,
            RecordingState::AwaitingUpload => RecordingPhase::AwaitingUpload,
            RecordingState::Uploading => RecordingPhase::Uploading,
            RecordingState::Completed => RecordingPhase::Completed,
            RecordingState::Abandoned => RecordingPhase::Abandoned,
        }
    }
}

#[derive(Debug, Error)]
pub enum MachineError {
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: RecordingPhase,
    },
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error(transparent)]
    Upload(#[from] UploadError),
}

pub struct RecordingMachine {
    question: Question,
    state: RecordingState,
    stream: Option<Box<dyn MediaStream>>,
    clip: Option<Clip>,
    recording: Option<Recording>,
    last_error: Option<String>,
}

impl RecordingMachine {
    /// Enters the preview state, acquiring the devices.
    ///
    /// A question without a timed asset passes straight to the countdown.
    pub fn start(question: Question, devices: &mut dyn MediaDevices) -> Self {
        let mut machine = Self {
            question,
            state: RecordingState::Countdown { remaining: 0 },
            stream: None,
            clip: None,
            recording: None,
            last_error: None,
        };
        machine.acquire(devices);
        machine
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn state(&self) -> &RecordingState {
        &self.state
    }

    pub fn phase(&self) -> RecordingPhase {
        self.state.phase()
    }

    /// The captured clip, while awaiting upload.
    pub fn clip(&self) -> Option<&Clip> {
        self.clip.as_ref()
    }

    pub fn recording(&self) -> Option<&Recording> {
        self.recording.as_ref()
    }

    /// User-facing message from the last failed upload or device error.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn holds_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Re-requests the devices after a permission failure.
    pub fn retry_devices(&mut self, devices: &mut dyn MediaDevices) -> Result<(), MachineError> {
        self.require_phase(RecordingPhase::ErrorAcquiringDevices, "retry device acquisition")?;
        self.acquire(devices);
        Ok(())
    }

    /// Advances the active timer by one second.
    ///
    /// Returns the new phase when a transition happened.
    pub fn tick(&mut self) -> Option<RecordingPhase> {
        match self.state {
            RecordingState::PreviewingMedia { remaining } if remaining > 1 => {
                self.state = RecordingState::PreviewingMedia { remaining: remaining - 1 };
                None
            }
            RecordingState::PreviewingMedia { .. } => {
                self.enter_countdown();
                Some(self.phase())
            }
            RecordingState::Countdown { remaining } if remaining > 1 => {
                self.state = RecordingState::Countdown { remaining: remaining - 1 };
                None
            }
            RecordingState::Countdown { .. } => {
                self.begin_recording();
                Some(self.phase())
            }
            RecordingState::Recording { remaining } if remaining > 1 => {
                self.state = RecordingState::Recording { remaining: remaining - 1 };
                None
            }
            RecordingState::Recording { .. } => {
                debug!(question_id = %self.question.id, "Response time elapsed");
                self.finish_recording();
                Some(self.phase())
            }
            RecordingState::ErrorAcquiringDevices(_)
            | RecordingState::AwaitingUpload
            | RecordingState::Uploading
            | RecordingState::Completed
            | RecordingState::Abandoned => None,
        }
    }

    /// Stops the recording before the response time runs out.
    pub fn stop(&mut self) -> Result<(), MachineError> {
        self.require_phase(RecordingPhase::Recording, "stop recording")?;
        self.finish_recording();
        Ok(())
    }

    /// Uploads the captured clip.
    ///
    /// Only valid from `AwaitingUpload`. On failure the machine returns to
    /// `AwaitingUpload` and the clip is kept for a manual retry.
    pub async fn upload(&mut self, uploads: &UploadService, name: &str) -> Result<&Recording, MachineError> {
        self.require_phase(RecordingPhase::AwaitingUpload, "upload")?;
        let Some(clip) = self.clip.as_ref() else {
            return Err(MachineError::InvalidTransition {
                action: "upload without a clip",
                phase: self.phase(),
            });
        };

        let result = {
            let _uploading = UploadingGuard::enter(&mut self.state);
            uploads.upload(&clip.bytes, name).await
        };
        match result {
            Ok(video) => {
                let mut recording = Recording::new(self.question.id.clone(), video.playable_url);
                recording.external_id = Some(video.external_id);
                self.clip = None;
                self.last_error = None;
                self.release_stream();
                self.state = RecordingState::Completed;
                info!(question_id = %self.question.id, "Question completed");
                Ok(self.recording.insert(recording))
            }
            Err(e) => {
                warn!(question_id = %self.question.id, %e, "Upload failed");
                self.last_error = Some("Failed to upload video. Please try again.".to_string());
                self.state = RecordingState::AwaitingUpload;
                Err(e.into())
            }
        }
    }

    /// Releases the stream without completing, e.g. when navigating away.
    ///
    /// An unfinished question becomes `Abandoned` and its clip is dropped; a
    /// completed one keeps its recording.
    pub fn teardown(&mut self) {
        self.release_stream();
        if self.phase() != RecordingPhase::Completed {
            debug!(question_id = %self.question.id, phase = ?self.phase(), "Question abandoned");
            self.clip = None;
            self.state = RecordingState::Abandoned;
        }
    }

    fn require_phase(&self, phase: RecordingPhase, action: &'static str) -> Result<(), MachineError> {
        if self.phase() == phase {
            Ok(())
        } else {
            Err(MachineError::InvalidTransition {
                action,
                phase: self.phase(),
            })
        }
    }

    fn acquire(&mut self, devices: &mut dyn MediaDevices) {
        self.release_stream();
        match devices.acquire() {
            Ok(stream) => {
                self.stream = Some(stream);
                self.last_error = None;
                match self.question.view_duration() {
                    Some(seconds) => {
                        self.state = RecordingState::PreviewingMedia { remaining: seconds };
                    }
                    None => self.enter_countdown(),
                }
            }
            Err(e) => self.device_failed(e),
        }
    }

    fn enter_countdown(&mut self) {
        self.state = RecordingState::Countdown {
            remaining: self.question.preparation_time,
        };
    }

    fn begin_recording(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            self.device_failed(DeviceError::Unavailable("stream not held".to_string()));
            return;
        };
        stream.play_cue();
        match stream.start_recording() {
            Ok(()) => {
                self.state = RecordingState::Recording {
                    remaining: self.question.response_time,
                };
            }
            Err(e) => self.device_failed(e),
        }
    }

    fn finish_recording(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            self.device_failed(DeviceError::Unavailable("stream not held".to_string()));
            return;
        };
        match stream.stop_recording() {
            Ok(clip) => {
                debug!(question_id = %self.question.id, bytes = clip.bytes.len(), "Clip captured");
                self.clip = Some(clip);
                self.state = RecordingState::AwaitingUpload;
            }
            Err(e) => self.device_failed(e),
        }
    }

    fn device_failed(&mut self, error: DeviceError) {
        warn!(question_id = %self.question.id, %error, "Device failure");
        self.release_stream();
        self.last_error = Some(error.guidance().to_string());
        self.state = RecordingState::ErrorAcquiringDevices(error);
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
        }
    }
}

/// Holds `Uploading` while an upload is in flight. Dropping it, including
/// when the upload future itself is dropped, falls back to `AwaitingUpload`.
struct UploadingGuard<'a> {
    state: &'a mut RecordingState,
}

impl<'a> UploadingGuard<'a> {
    fn enter(state: &'a mut RecordingState) -> Self {
        *state = RecordingState::Uploading;
        Self { state }
    }
}

impl Drop for UploadingGuard<'_> {
    fn drop(&mut self) {
        if *self.state == RecordingState::Uploading {
            *self.state = RecordingState::AwaitingUpload;
        }
    }
}

impl Drop for RecordingMachine {
    fn drop(&mut self) {
        self.release_stream();
    }
}
