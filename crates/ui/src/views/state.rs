use dioxus::prelude::*;

use services::AttemptError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    MissingPaper,
    Fetch,
    EmptyPaper,
    Submit,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingPaper => "No paper was selected. Pick a paper to start.",
            Self::Fetch => "Could not load the paper. Please try again.",
            Self::EmptyPaper => "This paper has no questions yet.",
            Self::Submit => "Could not submit your answers. Please try again.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }

    /// Errors that send the user back to the home page with a flash message.
    #[must_use]
    pub fn redirects_home(self) -> bool {
        matches!(self, Self::MissingPaper | Self::Fetch)
    }
}

impl From<&AttemptError> for ViewError {
    fn from(err: &AttemptError) -> Self {
        match err {
            AttemptError::MissingPaperId => Self::MissingPaper,
            AttemptError::Fetch(_) => Self::Fetch,
            AttemptError::EmptyPaper => Self::EmptyPaper,
            AttemptError::Submit(_) => Self::Submit,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
