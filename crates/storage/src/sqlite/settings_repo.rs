use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{SettingsRepository, StorageError};
use exam_core::model::{ClientSettings, ClientSettingsDraft};

use super::SqliteRepository;

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn load_settings(&self) -> Result<Option<ClientSettings>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT api_base_url, attempt_duration_secs
            FROM client_settings
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let api_base_url: String = row
            .try_get("api_base_url")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let attempt_duration_secs: i64 = row
            .try_get("attempt_duration_secs")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let attempt_duration_secs = u32::try_from(attempt_duration_secs).map_err(|_| {
            StorageError::Serialization("attempt_duration_secs out of range".into())
        })?;

        ClientSettingsDraft {
            api_base_url: Some(api_base_url),
            attempt_duration_secs: Some(attempt_duration_secs),
        }
        .validate()
        .map(Some)
        .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_settings(&self, settings: &ClientSettings) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO client_settings (id, api_base_url, attempt_duration_secs)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                api_base_url = excluded.api_base_url,
                attempt_duration_secs = excluded.attempt_duration_secs
            ",
        )
        .bind(1_i64)
        .bind(settings.api_base_url())
        .bind(i64::from(settings.attempt_duration_secs()))
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
