use std::sync::Arc;

use exam_core::Clock;
use exam_core::model::{ClientSession, ClientSessionDraft, ClientSettings, ClientSettingsDraft};
use storage::repository::{SessionRepository, SettingsRepository};

use crate::error::ClientSessionServiceError;

/// Signed-in state and client settings, backed by the local store.
#[derive(Clone)]
pub struct ClientSessionService {
    clock: Clock,
    sessions: Arc<dyn SessionRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl ClientSessionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        sessions: Arc<dyn SessionRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            clock,
            sessions,
            settings,
        }
    }

    /// Current session (signed out when nothing is stored).
    ///
    /// # Errors
    ///
    /// Returns `ClientSessionServiceError::Storage` on storage failures.
    pub async fn load(&self) -> Result<ClientSession, ClientSessionServiceError> {
        Ok(self.sessions.load_session().await?)
    }

    /// Validate and persist a signed-in session, stamped with the clock.
    ///
    /// With `remember_email`, the sign-in email is kept for the next login form.
    ///
    /// # Errors
    ///
    /// Returns `ClientSessionServiceError::Session` when the draft has no token
    /// or a malformed email, `Storage` when persistence fails.
    pub async fn sign_in(
        &self,
        draft: ClientSessionDraft,
        remember_email: bool,
    ) -> Result<ClientSession, ClientSessionServiceError> {
        let previous = self.sessions.load_session().await?;
        let remembered_email = if remember_email {
            draft.email.clone()
        } else {
            previous.remembered_email().map(str::to_string)
        };

        let session = ClientSessionDraft {
            remembered_email,
            signed_in_at: Some(self.clock.now()),
            ..draft
        }
        .validate_signed_in()?;

        self.sessions.save_session(&session).await?;
        tracing::info!(plan = %session.plan(), "Signed in");
        Ok(session)
    }

    /// Drop the token and account fields. Only the remembered email survives.
    ///
    /// # Errors
    ///
    /// Returns `ClientSessionServiceError::Storage` on storage failures.
    pub async fn sign_out(&self) -> Result<ClientSession, ClientSessionServiceError> {
        let session = self.sessions.load_session().await?.signed_out();
        if session.remembered_email().is_some() {
            self.sessions.save_session(&session).await?;
        } else {
            self.sessions.clear_session().await?;
        }
        tracing::info!("Signed out");
        Ok(session)
    }

    /// Persisted settings, or defaults when never saved.
    ///
    /// # Errors
    ///
    /// Returns `ClientSessionServiceError::Storage` on storage failures.
    pub async fn settings(&self) -> Result<ClientSettings, ClientSessionServiceError> {
        let settings = self.settings.load_settings().await?;
        Ok(settings.unwrap_or_default())
    }

    /// Validate and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `ClientSessionServiceError` if validation or persistence fails.
    pub async fn save_settings(
        &self,
        draft: ClientSettingsDraft,
    ) -> Result<ClientSettings, ClientSessionServiceError> {
        let settings = draft.validate()?;
        self.settings.save_settings(&settings).await?;
        Ok(settings)
    }
}
