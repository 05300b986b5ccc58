use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeviceError {
    #[error("camera or microphone permission denied")]
    PermissionDenied,
    #[error("camera or microphone unavailable: {0}")]
    Unavailable(String),
    #[error("recorder failure: {0}")]
    Recorder(String),
}

impl DeviceError {
    /// Actionable message shown to the student.
    pub fn guidance(&self) -> &'static str {
        match self {
            DeviceError::PermissionDenied => {
                "Please allow access to your camera and microphone to continue. You may need to reset permissions in your browser settings."
            }
            DeviceError::Unavailable(_) | DeviceError::Recorder(_) => {
                "There was an error accessing your camera or microphone. Please check your device settings."
            }
        }
    }
}

/// One contiguous recorded segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl Clip {
    pub fn webm(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "video/webm".to_string(),
        }
    }

    /// `data:` URL form accepted by the upload endpoint.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// Grants exclusive camera and microphone streams.
pub trait MediaDevices: Send {
    fn acquire(&mut self) -> Result<Box<dyn MediaStream>, DeviceError>;
}

/// An exclusively held camera and microphone stream.
///
/// `release` must be called before the devices are acquired again.
pub trait MediaStream: Send {
    fn start_recording(&mut self) -> Result<(), DeviceError>;

    fn stop_recording(&mut self) -> Result<Clip, DeviceError>;

    /// Audible cue played when recording begins.
    fn play_cue(&mut self);

    fn release(&mut self);
}
