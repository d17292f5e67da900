use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription tier of the signed-in user.
///
/// The backend reports plans by display name ("Pro Plan", "Teacher", ...).
/// Names are parsed once at the boundary; everything downstream matches on
/// the enum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Standard,
    Pro,
    Teacher,
    Government,
}

/// Navigation chrome a plan unlocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    Dashboard,
    Pro,
    Teacher,
    Government,
}

impl SubscriptionPlan {
    /// Parse a backend plan name. Unknown or empty names fall back to `Free`.
    #[must_use]
    pub fn from_plan_name(raw: &str) -> Self {
        let lower = raw.trim().to_ascii_lowercase();
        let head = lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .find(|part| !part.is_empty())
            .unwrap_or_default();
        match head {
            "standard" => Self::Standard,
            "pro" | "premium" => Self::Pro,
            "teacher" | "school" => Self::Teacher,
            "government" | "gov" => Self::Government,
            _ => Self::Free,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Standard => "standard",
            Self::Pro => "pro",
            Self::Teacher => "teacher",
            Self::Government => "government",
        }
    }

    #[must_use]
    pub fn layout(self) -> LayoutKind {
        match self {
            Self::Free | Self::Standard => LayoutKind::Dashboard,
            Self::Pro => LayoutKind::Pro,
            Self::Teacher => LayoutKind::Teacher,
            Self::Government => LayoutKind::Government,
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
