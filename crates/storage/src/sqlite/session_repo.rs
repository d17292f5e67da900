use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{SessionRepository, StorageError};
use exam_core::model::{ClientSession, ClientSessionDraft};

use super::SqliteRepository;

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn load_session(&self) -> Result<ClientSession, StorageError> {
        let row = sqlx::query(
            r"
            SELECT auth_token, email, remembered_email, plan, signed_in_at
            FROM client_session
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(ClientSession::default());
        };

        let ser = |err: sqlx::Error| StorageError::Serialization(err.to_string());
        let auth_token: Option<String> = row.try_get("auth_token").map_err(ser)?;
        let email: Option<String> = row.try_get("email").map_err(ser)?;
        let remembered_email: Option<String> = row.try_get("remembered_email").map_err(ser)?;
        let plan: String = row.try_get("plan").map_err(ser)?;
        let signed_in_at: Option<DateTime<Utc>> = row.try_get("signed_in_at").map_err(ser)?;

        ClientSessionDraft {
            auth_token,
            email,
            remembered_email,
            plan_name: Some(plan),
            signed_in_at,
        }
        .validate()
        .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_session(&self, session: &ClientSession) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO client_session (
                id, auth_token, email, remembered_email, plan, signed_in_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                auth_token = excluded.auth_token,
                email = excluded.email,
                remembered_email = excluded.remembered_email,
                plan = excluded.plan,
                signed_in_at = excluded.signed_in_at
            ",
        )
        .bind(1_i64)
        .bind(session.auth_token())
        .bind(session.email())
        .bind(session.remembered_email())
        .bind(session.plan().as_str())
        .bind(session.signed_in_at())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM client_session WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
