use serde::{Deserialize, Serialize};

/// Timing of one transcribed word, in milliseconds from the clip start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub text: String,
    #[serde(default)]
    pub confidence: f64,
    pub start: u64,
    pub end: u64,
}

/// Acoustic metrics computed by the speech collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcousticAnalysis {
    /// Words per minute.
    pub speech_rate: f64,
    pub pronunciation_score: f64,
    pub clarity_score: f64,
}

/// Completed transcript payload for one recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechAnalysis {
    #[serde(default)]
    pub text: Option<String>,
    /// Overall transcript confidence, 0..=1.
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub words: Vec<WordTiming>,
    #[serde(default, alias = "language_code")]
    pub language: Option<String>,
    /// Seconds.
    pub audio_duration: f64,
    /// Seconds of detected speech.
    pub speech_duration: f64,
    #[serde(default)]
    pub speaking_rate: Option<f64>,
    #[serde(default)]
    pub pause_count: u32,
    pub acoustic_analysis: AcousticAnalysis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub fluency: String,
    pub pronunciation: String,
    pub intelligibility: String,
    pub overall: String,
}

/// Rounded sub-scores. Nominally 0..=100 but composites are not clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    pub fluency: i32,
    pub pronunciation: i32,
    pub intelligibility: i32,
}

/// Scored result for one recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub fluency: i32,
    pub pronunciation: i32,
    pub intelligibility: i32,
    pub feedback: Feedback,
}

impl EvaluationResult {
    pub fn scores(&self) -> SubScores {
        SubScores {
            fluency: self.fluency,
            pronunciation: self.pronunciation,
            intelligibility: self.intelligibility,
        }
    }
}
