//! SQL-backed repository for app-level settings.

use super::SqliteStore;
use crate::storage::traits::ConfigRepository;
use crate::storage::StorageError;

impl ConfigRepository for SqliteStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM app_config WHERE key = ?")
                .bind(key)
                .fetch_optional(self.pool())
                .await?;

        Ok(row.map(|(value,)| value))
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO app_config (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Database;
    use super::*;

    #[tokio::test]
    async fn settings_upsert_and_read() {
        let db = Database::new_in_memory().await.unwrap();
        let store = SqliteStore::new(&db);

        assert_eq!(store.get_setting("sheet_url").await.unwrap(), None);
        store.put_setting("sheet_url", "https://a").await.unwrap();
        store.put_setting("sheet_url", "https://b").await.unwrap();
        assert_eq!(
            store.get_setting("sheet_url").await.unwrap().as_deref(),
            Some("https://b")
        );
    }
}
