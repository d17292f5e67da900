use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::QuestionId;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question must offer at least one option")]
    NoOptions,

    #[error("option label cannot be empty")]
    EmptyLabel,

    #[error("duplicate option label: {label}")]
    DuplicateLabel { label: String },

    #[error("marks must be a positive number, got {marks}")]
    InvalidMarks { marks: f64 },
}

/// A single multiple-choice question as shown during an attempt.
///
/// Options are keyed by a short label ("A".."D"). The backend does not
/// guarantee key order, so they are kept sorted by label. The correct answer
/// is never part of this type.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: BTreeMap<String, String>,
    marks: f64,
}

impl Question {
    /// Build a validated question.
    ///
    /// Labels and text are trimmed; option text may be empty (image-only
    /// options exist upstream), labels may not.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for empty text, an empty option set, empty or
    /// duplicate labels, or non-positive marks.
    pub fn new<I, L, T>(
        id: QuestionId,
        text: impl Into<String>,
        options: I,
        marks: f64,
    ) -> Result<Self, QuestionError>
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: Into<String>,
    {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if !marks.is_finite() || marks <= 0.0 {
            return Err(QuestionError::InvalidMarks { marks });
        }

        let mut map = BTreeMap::new();
        for (label, option_text) in options {
            let label = label.into().trim().to_string();
            if label.is_empty() {
                return Err(QuestionError::EmptyLabel);
            }
            if map.contains_key(&label) {
                return Err(QuestionError::DuplicateLabel { label });
            }
            map.insert(label, option_text.into());
        }
        if map.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        Ok(Self {
            id,
            text,
            options: map,
            marks,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn marks(&self) -> f64 {
        self.marks
    }

    /// Options in label order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options
            .iter()
            .map(|(label, text)| (label.as_str(), text.as_str()))
    }

    #[must_use]
    pub fn has_option(&self, label: &str) -> bool {
        self.options.contains_key(label)
    }

    /// Label of the option at `position` in display order.
    #[must_use]
    pub fn label_at(&self, position: usize) -> Option<&str> {
        self.options.keys().nth(position).map(String::as_str)
    }
}
