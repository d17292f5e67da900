#![forbid(unsafe_code)]

pub mod countdown;
pub mod error;
pub mod model;
pub mod time;

pub use countdown::{Countdown, DEFAULT_ATTEMPT_SECS};
pub use error::Error;
pub use time::Clock;
