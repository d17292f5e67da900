use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{PaperId, QuestionId};

/// One answered question in a submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPair {
    pub question_id: QuestionId,
    pub selected_answer: String,
}

/// What gets sent to the backend when an attempt is submitted.
///
/// Only answered questions are included, in the paper's question order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDraft {
    pub paper_id: PaperId,
    pub answers: Vec<AnswerPair>,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SubmitResultError {
    #[error("correct ({correct}) + wrong ({wrong}) exceeds total questions ({total})")]
    CountMismatch { total: u32, correct: u32, wrong: u32 },

    #[error("percentage out of range: {0}")]
    InvalidPercentage(f64),

    #[error("obtained marks ({obtained}) exceed total marks ({total})")]
    MarksMismatch { total: f64, obtained: f64 },
}

/// Per-question verdict returned after grading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub selected_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Score breakdown for a graded attempt.
///
/// Opaque to the attempt controller; it only hands it forward for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResult {
    total_questions: u32,
    correct: u32,
    wrong: u32,
    total_marks: f64,
    obtained_marks: f64,
    percentage: f64,
    outcomes: Vec<QuestionOutcome>,
}

impl SubmitResult {
    /// # Errors
    ///
    /// Returns `SubmitResultError` when the counts, marks or percentage are
    /// inconsistent with each other.
    pub fn new(
        total_questions: u32,
        correct: u32,
        wrong: u32,
        total_marks: f64,
        obtained_marks: f64,
        percentage: f64,
        outcomes: Vec<QuestionOutcome>,
    ) -> Result<Self, SubmitResultError> {
        if correct.saturating_add(wrong) > total_questions {
            return Err(SubmitResultError::CountMismatch {
                total: total_questions,
                correct,
                wrong,
            });
        }
        // Negative marking can push obtained marks and the percentage below
        // zero; only the upper bounds are checked.
        if !percentage.is_finite() || percentage > 100.0 {
            return Err(SubmitResultError::InvalidPercentage(percentage));
        }
        if obtained_marks > total_marks {
            return Err(SubmitResultError::MarksMismatch {
                total: total_marks,
                obtained: obtained_marks,
            });
        }

        Ok(Self {
            total_questions,
            correct,
            wrong,
            total_marks,
            obtained_marks,
            percentage,
            outcomes,
        })
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    /// Questions neither correct nor wrong.
    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.total_questions - self.correct - self.wrong
    }

    #[must_use]
    pub fn total_marks(&self) -> f64 {
        self.total_marks
    }

    #[must_use]
    pub fn obtained_marks(&self) -> f64 {
        self.obtained_marks
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }
}
