use std::collections::{HashMap, HashSet};
use std::fmt;

use exam_core::Countdown;
use exam_core::model::{
    AnswerPair, Paper, PaperId, Question, QuestionId, SubmissionDraft, SubmitResult,
};

use super::palette::PaletteState;
use super::progress::AttemptProgress;
use crate::error::AttemptError;

/// Who asked for the submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// User confirmed the submit dialog.
    Manual,
    /// Countdown reached zero; skips confirmation.
    Timeout,
}

/// Result of advancing the countdown by one second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused, submitting or finished; nothing changed.
    Frozen,
    /// One second elapsed, time remains.
    Running,
    /// This tick reached zero. The caller must submit with `SubmitTrigger::Timeout`.
    /// Emitted at most once per attempt.
    Expired,
    /// Already at zero; nothing changed.
    Idle,
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one timed attempt at a paper.
///
/// Tracks the current question, answers, the visited and reviewed sets and
/// the countdown. Invariant: a question with an answer is never in the
/// reviewed set after any operation returns.
pub struct AttemptSession {
    paper_id: PaperId,
    title: String,
    description: Option<String>,
    questions: Vec<Question>,
    current: usize,
    answers: HashMap<QuestionId, Option<String>>,
    visited: HashSet<QuestionId>,
    reviewed: HashSet<QuestionId>,
    duration: Countdown,
    countdown: Countdown,
    paused: bool,
    submitting: bool,
    result: Option<SubmitResult>,
}

impl AttemptSession {
    /// Start an attempt over the paper's questions, in the order given.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::EmptyPaper` if the paper has no questions.
    pub fn new(paper: Paper, duration: Countdown) -> Result<Self, AttemptError> {
        if paper.is_empty() {
            return Err(AttemptError::EmptyPaper);
        }
        let (paper_id, title, description, questions) = paper.into_parts();
        let answers = questions.iter().map(|q| (q.id(), None)).collect();

        let mut session = Self {
            paper_id,
            title,
            description,
            questions,
            current: 0,
            answers,
            visited: HashSet::new(),
            reviewed: HashSet::new(),
            duration,
            countdown: duration,
            paused: false,
            submitting: false,
            result: None,
        };
        session.set_current(0);
        Ok(session)
    }

    #[must_use]
    pub fn paper_id(&self) -> &PaperId {
        &self.paper_id
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
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// Answer currently selected for the displayed question.
    #[must_use]
    pub fn selected_answer(&self) -> Option<&str> {
        self.answer_for(self.current_question().id())
    }

    #[must_use]
    pub fn answer_for(&self, id: QuestionId) -> Option<&str> {
        self.answers.get(&id).and_then(|answer| answer.as_deref())
    }

    #[must_use]
    pub fn is_visited(&self, id: QuestionId) -> bool {
        self.visited.contains(&id)
    }

    #[must_use]
    pub fn is_reviewed(&self, id: QuestionId) -> bool {
        self.reviewed.contains(&id)
    }

    #[must_use]
    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    /// Seconds spent so far (time not counted while paused or submitting).
    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.duration.remaining_secs() - self.countdown.remaining_secs()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&SubmitResult> {
        self.result.as_ref()
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Move to the next question. Returns `false` at the last question.
    pub fn go_next(&mut self) -> bool {
        if self.is_finished() || self.current + 1 >= self.questions.len() {
            return false;
        }
        self.set_current(self.current + 1);
        true
    }

    /// Move to the previous question. Returns `false` at the first question.
    pub fn go_previous(&mut self) -> bool {
        if self.is_finished() || self.current == 0 {
            return false;
        }
        self.set_current(self.current - 1);
        true
    }

    /// Jump straight to `index` (palette click).
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::OutOfRange` for an invalid index and
    /// `AttemptError::Finished` after submission.
    pub fn jump_to(&mut self, index: usize) -> Result<(), AttemptError> {
        if self.is_finished() {
            return Err(AttemptError::Finished);
        }
        if index >= self.questions.len() {
            return Err(AttemptError::OutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        self.set_current(index);
        Ok(())
    }

    fn set_current(&mut self, index: usize) {
        self.current = index;
        let id = self.questions[index].id();
        self.visited.insert(id);
    }

    //
    // ─── ANSWERS ───────────────────────────────────────────────────────────────
    //

    fn ensure_mutable(&self) -> Result<(), AttemptError> {
        if self.is_finished() {
            return Err(AttemptError::Finished);
        }
        if self.submitting {
            return Err(AttemptError::Submitting);
        }
        Ok(())
    }

    /// Select `label` for the current question.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::UnknownOption` if the question has no such
    /// option, `Submitting`/`Finished` while a submission is in flight or done.
    pub fn select_answer(&mut self, label: &str) -> Result<(), AttemptError> {
        self.ensure_mutable()?;
        let question = self.current_question();
        if !question.has_option(label) {
            return Err(AttemptError::UnknownOption {
                label: label.to_string(),
            });
        }
        let id = question.id();
        self.answers.insert(id, Some(label.to_string()));
        self.reviewed.remove(&id);
        Ok(())
    }

    /// Select the option at `position` in display order (keyboard shortcut).
    ///
    /// # Errors
    ///
    /// Same as `select_answer`; an out-of-range position is `UnknownOption`.
    pub fn select_option_at(&mut self, position: usize) -> Result<(), AttemptError> {
        let label = self
            .current_question()
            .label_at(position)
            .map(str::to_string)
            .ok_or_else(|| AttemptError::UnknownOption {
                label: format!("#{}", position + 1),
            })?;
        self.select_answer(&label)
    }

    /// Remove the current answer. The question also loses any review flag.
    ///
    /// # Errors
    ///
    /// Returns `Submitting`/`Finished` while a submission is in flight or done.
    pub fn clear_answer(&mut self) -> Result<(), AttemptError> {
        self.ensure_mutable()?;
        let id = self.current_question().id();
        self.answers.insert(id, None);
        self.reviewed.remove(&id);
        Ok(())
    }

    /// Flag the current question for review and move on.
    ///
    /// An answered question is not flagged: the answer takes priority.
    ///
    /// # Errors
    ///
    /// Returns `Submitting`/`Finished` while a submission is in flight or done.
    pub fn mark_for_review(&mut self) -> Result<(), AttemptError> {
        self.ensure_mutable()?;
        let id = self.current_question().id();
        self.visited.insert(id);
        if self.answer_for(id).is_none() {
            self.reviewed.insert(id);
        }
        self.go_next();
        Ok(())
    }

    /// Keep the current answer (if any) and move on.
    ///
    /// # Errors
    ///
    /// Returns `Submitting`/`Finished` while a submission is in flight or done.
    pub fn save_and_next(&mut self) -> Result<(), AttemptError> {
        self.ensure_mutable()?;
        let id = self.current_question().id();
        self.visited.insert(id);
        if self.answer_for(id).is_some() {
            self.reviewed.remove(&id);
        }
        self.go_next();
        Ok(())
    }

    //
    // ─── PALETTE ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn palette_state(&self, index: usize) -> Option<PaletteState> {
        let id = self.questions.get(index)?.id();
        Some(PaletteState::derive(
            index == self.current,
            self.answer_for(id).is_some(),
            self.reviewed.contains(&id),
            self.visited.contains(&id),
        ))
    }

    /// Palette state for every question, in question order.
    #[must_use]
    pub fn palette(&self) -> Vec<PaletteState> {
        (0..self.questions.len())
            .filter_map(|index| self.palette_state(index))
            .collect()
    }

    #[must_use]
    pub fn progress(&self) -> AttemptProgress {
        let mut progress = AttemptProgress {
            total: self.questions.len(),
            ..AttemptProgress::default()
        };
        for question in &self.questions {
            let id = question.id();
            if self.answer_for(id).is_some() {
                progress.answered += 1;
            } else if self.reviewed.contains(&id) {
                progress.reviewed += 1;
            } else if self.visited.contains(&id) {
                progress.visited_unanswered += 1;
            } else {
                progress.not_visited += 1;
            }
        }
        progress
    }

    //
    // ─── TIMER ─────────────────────────────────────────────────────────────────
    //

    /// Flip the pause flag. Returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.is_finished() {
            self.paused = !self.paused;
        }
        self.paused
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.paused || self.submitting || self.is_finished() {
            return TickOutcome::Frozen;
        }
        if self.countdown.is_expired() {
            return TickOutcome::Idle;
        }
        if self.countdown.tick() {
            tracing::info!(paper_id = %self.paper_id, "Attempt time is up");
            TickOutcome::Expired
        } else {
            TickOutcome::Running
        }
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Lock the attempt for submission and build the payload.
    ///
    /// Only answered questions are included, in question order.
    ///
    /// # Errors
    ///
    /// Returns `Submitting` if a submission is already in flight, `Paused`
    /// while paused and `Finished` once a submission succeeded.
    pub fn begin_submit(&mut self, trigger: SubmitTrigger) -> Result<SubmissionDraft, AttemptError> {
        if self.is_finished() {
            return Err(AttemptError::Finished);
        }
        if self.submitting {
            return Err(AttemptError::Submitting);
        }
        if self.paused {
            return Err(AttemptError::Paused);
        }
        self.submitting = true;

        let answers = self
            .questions
            .iter()
            .filter_map(|question| {
                self.answer_for(question.id()).map(|label| AnswerPair {
                    question_id: question.id(),
                    selected_answer: label.to_string(),
                })
            })
            .collect::<Vec<_>>();

        tracing::info!(
            paper_id = %self.paper_id,
            ?trigger,
            answered = answers.len(),
            total = self.questions.len(),
            "Submitting attempt"
        );

        Ok(SubmissionDraft {
            paper_id: self.paper_id.clone(),
            answers,
        })
    }

    /// Record a successful submission; the attempt is finished afterwards.
    pub fn complete_submit(&mut self, result: SubmitResult) {
        self.submitting = false;
        self.result = Some(result);
    }

    /// Unlock after a failed submission. Answers and timer are untouched.
    pub fn fail_submit(&mut self) {
        self.submitting = false;
    }
}

impl fmt::Debug for AttemptSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptSession")
            .field("paper_id", &self.paper_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("visited_len", &self.visited.len())
            .field("reviewed_len", &self.reviewed.len())
            .field("countdown", &self.countdown)
            .field("paused", &self.paused)
            .field("submitting", &self.submitting)
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
