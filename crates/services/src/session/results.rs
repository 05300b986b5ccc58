use serde::{Deserialize, Serialize};
use speakcheck_models::{EvaluationResult, Feedback, SubScores};

use crate::scoring::round_score;

/// A recording as reported back for the results page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedRecording {
    pub question_id: String,
    #[serde(alias = "vimeoUrl")]
    pub video_url: String,
    #[serde(default)]
    pub evaluation: Option<EvaluationResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFeedback {
    pub question_id: String,
    pub scores: SubScores,
    pub feedback: Feedback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub final_scores: SubScores,
    pub feedback: Vec<QuestionFeedback>,
}

/// Mean of each sub-score over the evaluated recordings, rounded.
///
/// Unevaluated recordings are left out of the mean. With nothing evaluated
/// every score is 0.
pub fn aggregate<'a, I>(evaluations: I) -> SubScores
where
    I: IntoIterator<Item = &'a EvaluationResult>,
{
    let mut count = 0u32;
    let (mut fluency, mut pronunciation, mut intelligibility) = (0i64, 0i64, 0i64);
    for result in evaluations {
        count += 1;
        fluency += i64::from(result.fluency);
        pronunciation += i64::from(result.pronunciation);
        intelligibility += i64::from(result.intelligibility);
    }

    if count == 0 {
        return SubScores::default();
    }

    let mean = |total: i64| round_score(total as f64 / f64::from(count));
    SubScores {
        fluency: mean(fluency),
        pronunciation: mean(pronunciation),
        intelligibility: mean(intelligibility),
    }
}

pub fn report(recordings: &[EvaluatedRecording]) -> SessionReport {
    let final_scores = aggregate(recordings.iter().filter_map(|r| r.evaluation.as_ref()));
    let feedback = recordings
        .iter()
        .filter_map(|r| {
            r.evaluation.as_ref().map(|e| QuestionFeedback {
                question_id: r.question_id.clone(),
                scores: e.scores(),
                feedback: e.feedback.clone(),
            })
        })
        .collect();

    SessionReport {
        final_scores,
        feedback,
    }
}
