/// Display status of one question in the navigator grid.
///
/// Derived from the attempt's sets on every call; never stored. Precedence:
/// current, then answered, then reviewed, then visited, then not visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaletteState {
    Current,
    Answered,
    Reviewed,
    Visited,
    NotVisited,
}

impl PaletteState {
    #[must_use]
    pub fn derive(is_current: bool, is_answered: bool, is_reviewed: bool, is_visited: bool) -> Self {
        if is_current {
            Self::Current
        } else if is_answered {
            Self::Answered
        } else if is_reviewed {
            Self::Reviewed
        } else if is_visited {
            Self::Visited
        } else {
            Self::NotVisited
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Answered => "Answered",
            Self::Reviewed => "Marked for review",
            Self::Visited => "Not answered",
            Self::NotVisited => "Not visited",
        }
    }
}
