use thiserror::Error;
use url::Url;

use crate::countdown::DEFAULT_ATTEMPT_SECS;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSettings {
    api_base_url: String,
    attempt_duration_secs: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ClientSettingsDraft {
    pub api_base_url: Option<String>,
    pub attempt_duration_secs: Option<u32>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClientSettingsError {
    #[error("invalid API base URL: {raw}")]
    InvalidBaseUrl { raw: String },

    #[error("attempt duration must be at least one second")]
    ZeroDuration,
}

impl ClientSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft, filling unset fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `ClientSettingsError` if the URL does not parse as http(s) or the
    /// duration is zero.
    pub fn validate(self) -> Result<ClientSettings, ClientSettingsError> {
        let raw_url = self
            .api_base_url
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let valid = Url::parse(&raw_url)
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host());
        if !valid {
            return Err(ClientSettingsError::InvalidBaseUrl { raw: raw_url });
        }
        let api_base_url = raw_url.trim_end_matches('/').to_string();

        let attempt_duration_secs = self.attempt_duration_secs.unwrap_or(DEFAULT_ATTEMPT_SECS);
        if attempt_duration_secs == 0 {
            return Err(ClientSettingsError::ZeroDuration);
        }

        Ok(ClientSettings {
            api_base_url,
            attempt_duration_secs,
        })
    }
}

impl ClientSettings {
    /// Base URL without a trailing slash.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    #[must_use]
    pub fn attempt_duration_secs(&self) -> u32 {
        self.attempt_duration_secs
    }

    /// Apply overrides (e.g. from env or CLI) on top of these settings.
    ///
    /// # Errors
    ///
    /// Returns `ClientSettingsError` if an override is invalid.
    pub fn with_overrides(
        &self,
        overrides: ClientSettingsDraft,
    ) -> Result<Self, ClientSettingsError> {
        ClientSettingsDraft {
            api_base_url: overrides
                .api_base_url
                .or_else(|| Some(self.api_base_url.clone())),
            attempt_duration_secs: overrides
                .attempt_duration_secs
                .or(Some(self.attempt_duration_secs)),
        }
        .validate()
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            attempt_duration_secs: DEFAULT_ATTEMPT_SECS,
        }
    }
}
