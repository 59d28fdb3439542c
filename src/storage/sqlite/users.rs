//! SQL-backed repository for user accounts.

use super::SqliteStore;
use crate::model::{User, UserRole};
use crate::storage::traits::UserRepository;
use crate::storage::StorageError;

fn row_to_user((id, name, role): (String, String, String)) -> User {
    User {
        id,
        name,
        role: UserRole::from_str_lossy(&role),
    }
}

impl UserRepository for SqliteStore {
    async fn upsert_user(&self, user: &User) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, role)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name, role = excluded.role
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(user.role.as_str())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn load_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        let row: Option<(String, String, String)> =
            sqlx::query_as("SELECT id, name, role FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool())
                .await?;

        Ok(row.map(row_to_user))
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let rows: Vec<(String, String, String)> =
            sqlx::query_as("SELECT id, name, role FROM users ORDER BY id")
                .fetch_all(self.pool())
                .await?;

        Ok(rows.into_iter().map(row_to_user).collect())
    }
}
