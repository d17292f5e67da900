//! Collaborators the attempt controller talks to: the question source and the
//! answer sink. Both live behind the backend's REST API.

mod http;
mod wire;

use async_trait::async_trait;
use exam_core::model::{Paper, PaperId, SubmissionDraft, SubmitResult};

use crate::error::ApiError;

pub use http::{ApiConfig, HttpExamApi};

#[async_trait]
pub trait ExamApi: Send + Sync {
    /// Fetch a paper with its ordered question list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` / `ApiError::Unauthorized` for missing or
    /// forbidden papers, other variants for transport or decoding failures.
    async fn fetch_paper(&self, paper_id: &PaperId) -> Result<Paper, ApiError>;

    /// Submit the answered questions and receive the graded breakdown.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decoding failures.
    async fn submit_answers(&self, draft: &SubmissionDraft) -> Result<SubmitResult, ApiError>;
}
