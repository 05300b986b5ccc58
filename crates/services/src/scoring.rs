//! Heuristic ESL scoring of a completed speech analysis.
//!
//! The formulas are fixed for compatibility with previously issued scores.
//! Composite scores are not clamped; only the terms wrapped
//! in `max(0, ..)` are bounded.

use speakcheck_models::{EvaluationResult, Feedback, SpeechAnalysis, SubScores};
use thiserror::Error;

/// Words per minute treated as the ideal speaking rate.
pub const IDEAL_SPEECH_RATE: f64 = 150.0;

/// Scores below this select the low feedback tier.
pub const LOW_TIER_BELOW: f64 = 60.0;
/// Scores below this (and not low) select the medium tier.
pub const MEDIUM_TIER_BELOW: f64 = 80.0;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("audio duration must be positive, got {0}")]
    InvalidAudioDuration(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    pub fn for_score(score: f64) -> Self {
        if score < LOW_TIER_BELOW {
            Tier::Low
        } else if score < MEDIUM_TIER_BELOW {
            Tier::Medium
        } else {
            Tier::High
        }
    }
}

/// Intermediate fluency terms, kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluencyBreakdown {
    pub rate_score: f64,
    pub pause_score: f64,
    pub continuity_score: f64,
}

impl FluencyBreakdown {
    pub fn total(&self) -> f64 {
        self.rate_score * 0.4 + self.pause_score * 0.3 + self.continuity_score * 0.3
    }
}

pub fn fluency_breakdown(
    speech_rate: f64,
    pause_count: u32,
    speech_duration: f64,
    audio_duration: f64,
) -> FluencyBreakdown {
    let rate_score = (100.0 - (IDEAL_SPEECH_RATE - speech_rate).abs()).max(0.0);

    // Zero speech duration yields an infinite (or NaN) ratio; `max` maps
    // both to a pause score of 0.
    let pause_ratio = f64::from(pause_count) / (speech_duration / 60.0);
    let pause_score = (100.0 - pause_ratio * 20.0).max(0.0);

    let continuity_score = (speech_duration / audio_duration) * 100.0;

    FluencyBreakdown {
        rate_score,
        pause_score,
        continuity_score,
    }
}

/// Rounds half-way values toward positive infinity.
///
/// Compares the fractional part directly; `floor(x + 0.5)` rounds values
/// just below one half up because the addition itself rounds.
pub fn round_score(value: f64) -> i32 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        (floor + 1.0) as i32
    } else {
        floor as i32
    }
}

/// Maps one speech analysis to rounded sub-scores and feedback.
pub fn score(analysis: &SpeechAnalysis) -> Result<EvaluationResult, ScoringError> {
    if !analysis.audio_duration.is_finite() || analysis.audio_duration <= 0.0 {
        return Err(ScoringError::InvalidAudioDuration(analysis.audio_duration));
    }

    let acoustic = &analysis.acoustic_analysis;
    let fluency = fluency_breakdown(
        acoustic.speech_rate,
        analysis.pause_count,
        analysis.speech_duration,
        analysis.audio_duration,
    )
    .total();
    let pronunciation = acoustic.pronunciation_score;
    let intelligibility = acoustic.clarity_score * 0.6 + analysis.confidence * 40.0;

    let scores = SubScores {
        fluency: round_score(fluency),
        pronunciation: round_score(pronunciation),
        intelligibility: round_score(intelligibility),
    };

    let feedback = Feedback {
        fluency: fluency_feedback(Tier::for_score(fluency)).to_string(),
        pronunciation: pronunciation_feedback(Tier::for_score(pronunciation)).to_string(),
        intelligibility: intelligibility_feedback(Tier::for_score(intelligibility)).to_string(),
        overall: overall_feedback(&scores),
    };

    Ok(EvaluationResult {
        fluency: scores.fluency,
        pronunciation: scores.pronunciation,
        intelligibility: scores.intelligibility,
        feedback,
    })
}

pub fn fluency_feedback(tier: Tier) -> &'static str {
    match tier {
        Tier::Low => {
            "Try to speak more continuously with fewer pauses. Practice connecting your ideas smoothly."
        }
        Tier::Medium => {
            "Your speech flow is good but could be more natural. Focus on maintaining a steady pace."
        }
        Tier::High => "Excellent speech flow and natural pacing!",
    }
}

pub fn pronunciation_feedback(tier: Tier) -> &'static str {
    match tier {
        Tier::Low => {
            "Focus on clear pronunciation of individual sounds. Practice stress and intonation patterns."
        }
        Tier::Medium => {
            "Good pronunciation with some areas for improvement. Pay attention to stress patterns."
        }
        Tier::High => "Very clear pronunciation with good stress and intonation!",
    }
}

pub fn intelligibility_feedback(tier: Tier) -> &'static str {
    match tier {
        Tier::Low => "Work on speaking more clearly and ensuring your message is easily understood.",
        Tier::Medium => "Your speech is generally clear but could be more consistent throughout.",
        Tier::High => "Excellent clarity and very easy to understand!",
    }
}

/// Overall line from the unweighted mean of the three rounded sub-scores.
pub fn overall_feedback(scores: &SubScores) -> String {
    let mean = f64::from(scores.fluency + scores.pronunciation + scores.intelligibility) / 3.0;
    let advice = match Tier::for_score(mean) {
        Tier::Low => "Focus on practicing regularly to improve your speaking skills.",
        Tier::Medium => "Good progress! Keep practicing to enhance your speaking abilities.",
        Tier::High => "Excellent speaking skills! Keep maintaining this high standard.",
    };
    format!("Overall performance: {}%. {}", round_score(mean), advice)
}
