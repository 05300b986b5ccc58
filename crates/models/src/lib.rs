pub mod evaluation;
pub mod question;
pub mod recording;
pub mod student;

pub use evaluation::{
    AcousticAnalysis, EvaluationResult, Feedback, SpeechAnalysis, SubScores, WordTiming,
};
pub use question::{Category, MediaAsset, MediaKind, Question};
pub use recording::Recording;
pub use student::StudentIdentity;
