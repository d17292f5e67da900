mod palette;
mod progress;
mod service;
mod workflow;

pub use palette::PaletteState;
pub use progress::AttemptProgress;
pub use service::{AttemptSession, SubmitTrigger, TickOutcome};
pub use workflow::AttemptLoopService;
