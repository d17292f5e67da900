use thiserror::Error;

use crate::model::{
    ClientSessionError, ClientSettingsError, PaperError, ParseIdError, QuestionError,
    SubmitResultError,
};

/// Any domain validation failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Paper(#[from] PaperError),
    #[error(transparent)]
    SubmitResult(#[from] SubmitResultError),
    #[error(transparent)]
    Session(#[from] ClientSessionError),
    #[error(transparent)]
    Settings(#[from] ClientSettingsError),
}
