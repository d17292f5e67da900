use std::sync::Arc;

use exam_core::Countdown;
use exam_core::model::{PaperId, SubmissionDraft, SubmitResult};

use super::service::{AttemptSession, SubmitTrigger};
use crate::api::ExamApi;
use crate::error::AttemptError;

/// Orchestrates attempt start and submission against the exam backend.
#[derive(Clone)]
pub struct AttemptLoopService {
    api: Arc<dyn ExamApi>,
    duration: Countdown,
}

impl AttemptLoopService {
    #[must_use]
    pub fn new(api: Arc<dyn ExamApi>) -> Self {
        Self {
            api,
            duration: Countdown::default(),
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Countdown) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn duration(&self) -> Countdown {
        self.duration
    }

    /// Fetch the paper and start a fresh attempt at it.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::MissingPaperId` when no usable id is given,
    /// `AttemptError::Fetch` when the backend call fails and
    /// `AttemptError::EmptyPaper` when the paper has no questions.
    pub async fn start_attempt(&self, paper_id: Option<&str>) -> Result<AttemptSession, AttemptError> {
        let paper_id = paper_id
            .and_then(|raw| PaperId::new(raw).ok())
            .ok_or(AttemptError::MissingPaperId)?;

        let paper = self.api.fetch_paper(&paper_id).await.map_err(|err| {
            tracing::warn!(%paper_id, error = %err, "Failed to load paper");
            AttemptError::Fetch(err)
        })?;

        let session = AttemptSession::new(paper, self.duration)?;
        tracing::info!(
            %paper_id,
            questions = session.total_questions(),
            remaining = %session.countdown(),
            "Attempt started"
        );
        Ok(session)
    }

    /// Send a prepared submission to the backend.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Submit` when the backend call fails.
    pub async fn submit(&self, draft: &SubmissionDraft) -> Result<SubmitResult, AttemptError> {
        self.api.submit_answers(draft).await.map_err(|err| {
            tracing::warn!(paper_id = %draft.paper_id, error = %err, "Submission failed");
            AttemptError::Submit(err)
        })
    }

    /// Submit the attempt end to end: lock, send, then finish or unlock.
    ///
    /// # Errors
    ///
    /// Returns the `begin_submit` error if the attempt cannot be submitted now,
    /// or `AttemptError::Submit` when the backend call fails. In the latter case
    /// the attempt is left as it was so the user can retry.
    pub async fn submit_attempt(
        &self,
        session: &mut AttemptSession,
        trigger: SubmitTrigger,
    ) -> Result<SubmitResult, AttemptError> {
        let draft = session.begin_submit(trigger)?;
        match self.submit(&draft).await {
            Ok(result) => {
                tracing::info!(
                    paper_id = %draft.paper_id,
                    obtained = result.obtained_marks(),
                    total = result.total_marks(),
                    "Attempt submitted"
                );
                session.complete_submit(result.clone());
                Ok(result)
            }
            Err(err) => {
                session.fail_submit();
                Err(err)
            }
        }
    }
}
