use std::collections::HashSet;

use thiserror::Error;

use crate::model::{PaperId, Question, QuestionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PaperError {
    #[error("paper title cannot be empty")]
    EmptyTitle,

    #[error("question {id} appears more than once")]
    DuplicateQuestion { id: QuestionId },
}

/// A named, ordered collection of questions (e.g. a past exam).
///
/// Question order is exactly the order supplied by the backend; it defines
/// the index-to-question mapping used by an attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    id: PaperId,
    title: String,
    description: Option<String>,
    questions: Vec<Question>,
}

impl Paper {
    /// # Errors
    ///
    /// Returns `PaperError::EmptyTitle` for a blank title and
    /// `PaperError::DuplicateQuestion` when two questions share an id.
    pub fn new(
        id: PaperId,
        title: impl Into<String>,
        description: Option<String>,
        questions: Vec<Question>,
    ) -> Result<Self, PaperError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(PaperError::EmptyTitle);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(PaperError::DuplicateQuestion { id: question.id() });
            }
        }

        let description = description
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            id,
            title,
            description,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> &PaperId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Sum of marks over all questions.
    #[must_use]
    pub fn total_marks(&self) -> f64 {
        self.questions.iter().map(Question::marks).sum()
    }

    /// Split into its id, title, description and owned question list.
    #[must_use]
    pub fn into_parts(self) -> (PaperId, String, Option<String>, Vec<Question>) {
        (self.id, self.title, self.description, self.questions)
    }
}
