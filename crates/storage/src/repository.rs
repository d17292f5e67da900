use async_trait::async_trait;
use exam_core::model::{ClientSession, ClientSettings};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted signed-in state (token, email, plan).
///
/// There is at most one session per store. `load_session` returns the
/// default (signed-out) session when nothing was saved yet.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be read or decoded.
    async fn load_session(&self) -> Result<ClientSession, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn save_session(&self, session: &ClientSession) -> Result<(), StorageError>;

    /// Remove any stored session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn clear_session(&self) -> Result<(), StorageError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch persisted settings, `None` when never saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be read or decoded.
    async fn load_settings(&self) -> Result<Option<ClientSettings>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be stored.
    async fn save_settings(&self, settings: &ClientSettings) -> Result<(), StorageError>;
}

/// In-memory store for tests and throwaway runs.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    session: Arc<Mutex<Option<ClientSession>>>,
    settings: Arc<Mutex<Option<ClientSettings>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn load_session(&self) -> Result<ClientSession, StorageError> {
        let guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone().unwrap_or_default())
    }

    async fn save_session(&self, session: &ClientSession) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryStore {
    async fn load_settings(&self) -> Result<Option<ClientSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_settings(&self, settings: &ClientSettings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}

/// Aggregates the client repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        let sessions: Arc<dyn SessionRepository> = Arc::new(store.clone());
        let settings: Arc<dyn SettingsRepository> = Arc::new(store);
        Self { sessions, settings }
    }
}
