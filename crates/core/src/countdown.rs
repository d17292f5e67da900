use std::fmt;

/// Default attempt length: 1h 29m 59s.
pub const DEFAULT_ATTEMPT_SECS: u32 = 89 * 60 + 59;

/// Seconds left in an attempt. Counts down to zero and stays there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    #[must_use]
    pub fn from_secs(remaining: u32) -> Self {
        Self { remaining }
    }

    #[must_use]
    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self::from_secs(
            hours
                .saturating_mul(3600)
                .saturating_add(minutes.saturating_mul(60))
                .saturating_add(seconds),
        )
    }

    #[must_use]
    pub fn remaining_secs(self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_expired(self) -> bool {
        self.remaining == 0
    }

    /// Remove one second. Returns `true` only on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    /// `(hours, minutes, seconds)` with minutes and seconds in `0..60`.
    #[must_use]
    pub fn hms(self) -> (u32, u32, u32) {
        (
            self.remaining / 3600,
            (self.remaining % 3600) / 60,
            self.remaining % 60,
        )
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::from_secs(DEFAULT_ATTEMPT_SECS)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes, seconds) = self.hms();
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}
