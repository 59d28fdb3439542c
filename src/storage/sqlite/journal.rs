//! SQL-backed repository for reflections and handwriting logs.

use super::SqliteStore;
use crate::model::{HandwritingEntry, Reflection};
use crate::storage::traits::JournalRepository;
use crate::storage::StorageError;

impl JournalRepository for SqliteStore {
    async fn load_reflection(&self, user_id: &str) -> Result<Option<Reflection>, StorageError> {
        let row: Option<(String, Option<String>)> =
            sqlx::query_as("SELECT reflection, feedback FROM reflections WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(self.pool())
                .await?;

        Ok(row.map(|(text, feedback)| Reflection { text, feedback }))
    }

    async fn save_reflection(
        &self,
        user_id: &str,
        reflection: &Reflection,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO reflections (user_id, reflection, feedback)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                reflection = excluded.reflection,
                feedback = excluded.feedback
            "#,
        )
        .bind(user_id)
        .bind(&reflection.text)
        .bind(&reflection.feedback)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn list_handwriting(&self, user_id: &str) -> Result<Vec<HandwritingEntry>, StorageError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT phrase, created_at
            FROM handwriting_logs
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(phrase, created_at)| HandwritingEntry {
                phrase,
                created_at: created_at as u64,
            })
            .collect())
    }

    async fn append_handwriting(
        &self,
        user_id: &str,
        entry: &HandwritingEntry,
    ) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO handwriting_logs (user_id, phrase, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(&entry.phrase)
            .bind(entry.created_at as i64)
            .execute(self.pool())
            .await?;

        Ok(())
    }
}
