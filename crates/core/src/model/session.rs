use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::SubscriptionPlan;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClientSessionError {
    #[error("auth token is required")]
    MissingToken,

    #[error("invalid email address: {raw}")]
    InvalidEmail { raw: String },
}

/// Signed-in state of the client: what the web app kept in local storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSession {
    auth_token: Option<String>,
    email: Option<String>,
    remembered_email: Option<String>,
    plan: SubscriptionPlan,
    signed_in_at: Option<DateTime<Utc>>,
}

/// Unvalidated session fields, as collected from a login response or storage.
#[derive(Clone, Debug, Default)]
pub struct ClientSessionDraft {
    pub auth_token: Option<String>,
    pub email: Option<String>,
    pub remembered_email: Option<String>,
    pub plan_name: Option<String>,
    pub signed_in_at: Option<DateTime<Utc>>,
}

impl ClientSessionDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize into a session. Blank fields become `None`.
    ///
    /// # Errors
    ///
    /// Returns `ClientSessionError::InvalidEmail` if an email is present but
    /// malformed.
    pub fn validate(self) -> Result<ClientSession, ClientSessionError> {
        let email = normalize_email(self.email)?;
        let remembered_email = normalize_email(self.remembered_email)?;
        let plan = normalize_optional(self.plan_name)
            .map_or(SubscriptionPlan::Free, |name| {
                SubscriptionPlan::from_plan_name(&name)
            });

        Ok(ClientSession {
            auth_token: normalize_optional(self.auth_token),
            email,
            remembered_email,
            plan,
            signed_in_at: self.signed_in_at,
        })
    }

    /// Like `validate`, but requires an auth token (used on sign-in).
    ///
    /// # Errors
    ///
    /// Returns `ClientSessionError::MissingToken` if no token is present.
    pub fn validate_signed_in(self) -> Result<ClientSession, ClientSessionError> {
        let session = self.validate()?;
        if session.auth_token.is_none() {
            return Err(ClientSessionError::MissingToken);
        }
        Ok(session)
    }
}

impl ClientSession {
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn remembered_email(&self) -> Option<&str> {
        self.remembered_email.as_deref()
    }

    #[must_use]
    pub fn plan(&self) -> SubscriptionPlan {
        self.plan
    }

    #[must_use]
    pub fn signed_in_at(&self) -> Option<DateTime<Utc>> {
        self.signed_in_at
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.auth_token.is_some()
    }

    /// The session left behind after sign-out: only the remembered email survives.
    #[must_use]
    pub fn signed_out(&self) -> Self {
        Self {
            remembered_email: self.remembered_email.clone(),
            ..Self::default()
        }
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self {
            auth_token: None,
            email: None,
            remembered_email: None,
            plan: SubscriptionPlan::Free,
            signed_in_at: None,
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn normalize_email(value: Option<String>) -> Result<Option<String>, ClientSessionError> {
    let Some(email) = normalize_optional(value) else {
        return Ok(None);
    };
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(ClientSessionError::InvalidEmail { raw: email });
    }
    Ok(Some(email.to_ascii_lowercase()))
}
