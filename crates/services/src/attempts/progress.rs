/// Aggregated counts over an attempt, used by the submit confirmation and legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttemptProgress {
    pub total: usize,
    pub answered: usize,
    pub reviewed: usize,
    pub visited_unanswered: usize,
    pub not_visited: usize,
}

impl AttemptProgress {
    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.total - self.answered
    }
}
