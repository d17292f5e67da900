mod attempt_vm;
mod markdown_vm;
mod time_fmt;

pub use attempt_vm::{
    AttemptIntent, AttemptVm, OptionVm, OutcomeVm, PaletteCellVm, QuestionVm, ResultVm,
    palette_class, start_attempt,
};
pub use markdown_vm::{question_html, sanitize_html};
pub use time_fmt::{format_countdown, format_marks, format_percentage};
