use exam_core::Countdown;
use exam_core::model::{SubmissionDraft, SubmitResult};
use services::{
    AttemptError, AttemptLoopService, AttemptProgress, AttemptSession, PaletteState,
    SubmitTrigger, TickOutcome,
};

use crate::views::ViewError;
use crate::vm::markdown_vm::question_html;
use crate::vm::time_fmt::{format_countdown, format_marks, format_percentage};

/// Synchronous user actions on the attempt page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptIntent {
    Previous,
    Next,
    Jump(usize),
    Select(String),
    SelectAt(usize),
    Clear,
    MarkForReview,
    SaveAndNext,
    TogglePause,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub label: String,
    pub text: String,
    pub selected: bool,
}

impl OptionVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.selected {
            "option option--selected"
        } else {
            "option"
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuestionVm {
    pub number: usize,
    pub total: usize,
    pub html: String,
    pub marks: String,
    pub options: Vec<OptionVm>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteCellVm {
    pub index: usize,
    pub state: PaletteState,
}

impl PaletteCellVm {
    #[must_use]
    pub fn number(self) -> usize {
        self.index + 1
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        palette_class(self.state)
    }
}

#[must_use]
pub fn palette_class(state: PaletteState) -> &'static str {
    match state {
        PaletteState::Current => "palette__cell palette__cell--current",
        PaletteState::Answered => "palette__cell palette__cell--answered",
        PaletteState::Reviewed => "palette__cell palette__cell--reviewed",
        PaletteState::Visited => "palette__cell palette__cell--visited",
        PaletteState::NotVisited => "palette__cell palette__cell--not-visited",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutcomeVm {
    pub number: Option<usize>,
    pub selected: String,
    pub correct: String,
    pub is_correct: bool,
}

impl OutcomeVm {
    #[must_use]
    pub fn verdict(&self) -> &'static str {
        if self.is_correct { "correct" } else { "wrong" }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultVm {
    pub total_questions: u32,
    pub correct: u32,
    pub wrong: u32,
    pub unanswered: u32,
    pub time_taken: String,
    pub marks: String,
    pub percentage: String,
    pub outcomes: Vec<OutcomeVm>,
}

pub struct AttemptVm {
    session: AttemptSession,
}

impl AttemptVm {
    #[must_use]
    pub fn new(session: AttemptSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.session.title()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.session.description()
    }

    #[must_use]
    pub fn question(&self) -> QuestionVm {
        let question = self.session.current_question();
        let selected = self.session.selected_answer();
        QuestionVm {
            number: self.session.current_index() + 1,
            total: self.session.total_questions(),
            html: question_html(question.text()),
            marks: format_marks(question.marks()),
            options: question
                .options()
                .map(|(label, text)| OptionVm {
                    label: label.to_string(),
                    text: text.to_string(),
                    selected: selected == Some(label),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn palette(&self) -> Vec<PaletteCellVm> {
        self.session
            .palette()
            .into_iter()
            .enumerate()
            .map(|(index, state)| PaletteCellVm { index, state })
            .collect()
    }

    #[must_use]
    pub fn progress(&self) -> AttemptProgress {
        self.session.progress()
    }

    #[must_use]
    pub fn timer_label(&self) -> String {
        format_countdown(self.session.countdown())
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.session.current_index() == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.session.current_index() + 1 == self.session.total_questions()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.session.is_paused()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.session.is_submitting()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    #[must_use]
    pub fn session(&self) -> &AttemptSession {
        &self.session
    }

    #[must_use]
    pub fn result(&self) -> Option<ResultVm> {
        self.session.result().map(|result| self.map_result(result))
    }

    fn map_result(&self, result: &SubmitResult) -> ResultVm {
        let questions = self.session.questions();
        ResultVm {
            total_questions: result.total_questions(),
            correct: result.correct(),
            wrong: result.wrong(),
            unanswered: result.unanswered(),
            time_taken: format_countdown(Countdown::from_secs(self.session.elapsed_secs())),
            marks: format!(
                "{} / {}",
                format_marks(result.obtained_marks()),
                format_marks(result.total_marks())
            ),
            percentage: format_percentage(result.percentage()),
            outcomes: result
                .outcomes()
                .iter()
                .map(|outcome| OutcomeVm {
                    number: questions
                        .iter()
                        .position(|q| q.id() == outcome.question_id)
                        .map(|index| index + 1),
                    selected: outcome
                        .selected_answer
                        .clone()
                        .unwrap_or_else(|| "-".to_string()),
                    correct: outcome.correct_answer.clone(),
                    is_correct: outcome.is_correct,
                })
                .collect(),
        }
    }

    /// # Errors
    ///
    /// Returns the controller's `AttemptError` when the action is not allowed.
    pub fn apply(&mut self, intent: AttemptIntent) -> Result<(), AttemptError> {
        match intent {
            AttemptIntent::Previous => {
                self.session.go_previous();
            }
            AttemptIntent::Next => {
                self.session.go_next();
            }
            AttemptIntent::Jump(index) => self.session.jump_to(index)?,
            AttemptIntent::Select(label) => self.session.select_answer(&label)?,
            AttemptIntent::SelectAt(position) => self.session.select_option_at(position)?,
            AttemptIntent::Clear => self.session.clear_answer()?,
            AttemptIntent::MarkForReview => self.session.mark_for_review()?,
            AttemptIntent::SaveAndNext => self.session.save_and_next()?,
            AttemptIntent::TogglePause => {
                self.session.toggle_pause();
            }
        }
        Ok(())
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.session.tick()
    }

    /// # Errors
    ///
    /// Returns `AttemptError` when the attempt cannot be submitted right now.
    pub fn begin_submit(&mut self, trigger: SubmitTrigger) -> Result<SubmissionDraft, AttemptError> {
        self.session.begin_submit(trigger)
    }

    pub fn complete_submit(&mut self, result: SubmitResult) {
        self.session.complete_submit(result);
    }

    pub fn fail_submit(&mut self) {
        self.session.fail_submit();
    }
}

/// # Errors
///
/// Returns `ViewError::MissingPaper`, `ViewError::Fetch` or
/// `ViewError::EmptyPaper` depending on why the attempt could not start.
pub async fn start_attempt(
    attempt_loop: &AttemptLoopService,
    paper_id: &str,
) -> Result<AttemptVm, ViewError> {
    attempt_loop
        .start_attempt(Some(paper_id))
        .await
        .map(AttemptVm::new)
        .map_err(|err| ViewError::from(&err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Paper, PaperId, Question, QuestionId, QuestionOutcome};

    fn vm() -> AttemptVm {
        let questions = (1..=3)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    format!("Question *{id}*"),
                    [("B", "second"), ("A", "first")],
                    2.0,
                )
                .unwrap()
            })
            .collect();
        let paper = Paper::new(PaperId::new("p").unwrap(), "Paper", None, questions).unwrap();
        AttemptVm::new(AttemptSession::new(paper, Countdown::from_secs(90)).unwrap())
    }

    #[test]
    fn question_vm_lists_sorted_options_and_selection() {
        let mut vm = vm();
        assert_eq!(vm.description(), None);
        vm.apply(AttemptIntent::Select("B".into())).unwrap();
        let question = vm.question();
        assert_eq!(question.number, 1);
        assert_eq!(question.total, 3);
        assert_eq!(question.marks, "2");
        assert!(question.html.contains("<em>1</em>"));
        let labels: Vec<_> = question.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["A", "B"]);
        assert!(question.options[1].selected);
        assert!(!question.options[0].selected);
    }

    #[test]
    fn intents_drive_the_palette() {
        let mut vm = vm();
        vm.apply(AttemptIntent::SelectAt(0)).unwrap();
        vm.apply(AttemptIntent::SaveAndNext).unwrap();
        vm.apply(AttemptIntent::MarkForReview).unwrap();

        let states: Vec<_> = vm.palette().iter().map(|cell| cell.state).collect();
        assert_eq!(
            states,
            [PaletteState::Answered, PaletteState::Reviewed, PaletteState::Current]
        );
        assert!(vm.is_last());
        assert_eq!(vm.palette()[2].number(), 3);
        assert!(vm.apply(AttemptIntent::Jump(7)).is_err());
    }

    #[test]
    fn result_vm_maps_question_numbers() {
        let mut vm = vm();
        for _ in 0..65 {
            let _ = vm.tick();
        }
        vm.begin_submit(SubmitTrigger::Manual).unwrap();
        let result = SubmitResult::new(
            3,
            1,
            1,
            6.0,
            1.5,
            25.0,
            vec![
                QuestionOutcome {
                    question_id: QuestionId::new(2),
                    selected_answer: Some("A".into()),
                    correct_answer: "A".into(),
                    is_correct: true,
                },
                QuestionOutcome {
                    question_id: QuestionId::new(3),
                    selected_answer: None,
                    correct_answer: "B".into(),
                    is_correct: false,
                },
            ],
        )
        .unwrap();
        vm.complete_submit(result);

        let result = vm.result().unwrap();
        assert_eq!(result.marks, "1.50 / 6");
        assert_eq!(result.percentage, "25.00%");
        assert_eq!(result.unanswered, 1);
        assert_eq!(result.time_taken, "00:01:05");
        assert_eq!(result.outcomes[0].number, Some(2));
        assert_eq!(result.outcomes[1].selected, "-");
    }
}
