#![forbid(unsafe_code)]

pub mod api;
pub mod attempts;
pub mod client_session_service;
pub mod error;

pub use exam_core::Clock;

pub use api::{ApiConfig, ExamApi, HttpExamApi};
pub use attempts::{
    AttemptLoopService, AttemptProgress, AttemptSession, PaletteState, SubmitTrigger, TickOutcome,
};
pub use client_session_service::ClientSessionService;
pub use error::{ApiError, AttemptError, ClientSessionServiceError};
