use exam_core::Countdown;

#[must_use]
pub fn format_countdown(countdown: Countdown) -> String {
    countdown.to_string()
}

/// Marks without a trailing `.0` for whole numbers.
#[must_use]
pub fn format_marks(marks: f64) -> String {
    if marks.fract() == 0.0 {
        format!("{marks:.0}")
    } else {
        format!("{marks:.2}")
    }
}

#[must_use]
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.2}%")
}
