mod ids;
mod paper;
mod plan;
mod question;
mod session;
mod settings;
mod submission;

pub use ids::{PaperId, ParseIdError, QuestionId};
pub use paper::{Paper, PaperError};
pub use plan::{LayoutKind, SubscriptionPlan};
pub use question::{Question, QuestionError};
pub use session::{ClientSession, ClientSessionDraft, ClientSessionError};
pub use settings::{ClientSettings, ClientSettingsDraft, ClientSettingsError, DEFAULT_API_BASE_URL};
pub use submission::{
    AnswerPair, QuestionOutcome, SubmissionDraft, SubmitResult, SubmitResultError,
};
