//! SQL-backed repository for habit challenges.

use super::SqliteStore;
use crate::model::Challenge;
use crate::storage::traits::ChallengeRepository;
use crate::storage::StorageError;

type ChallengeRow = (String, String, String, i64, i64, String, String);

fn row_to_challenge(
    (id, title, description, days_total, days_completed, badge_icon, color): ChallengeRow,
) -> Challenge {
    Challenge {
        id,
        title,
        description,
        days_total: days_total as u32,
        days_completed: days_completed as u32,
        badge_icon,
        color,
    }
}

impl ChallengeRepository for SqliteStore {
    async fn list_challenges(&self, user_id: &str) -> Result<Vec<Challenge>, StorageError> {
        let rows: Vec<ChallengeRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, days_total, days_completed, badge_icon, color
            FROM challenges
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(row_to_challenge).collect())
    }

    async fn upsert_challenge(
        &self,
        user_id: &str,
        challenge: &Challenge,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO challenges
                (id, user_id, title, description, days_total, days_completed,
                 badge_icon, color)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                title = excluded.title,
                description = excluded.description,
                days_total = excluded.days_total,
                days_completed = excluded.days_completed,
                badge_icon = excluded.badge_icon,
                color = excluded.color
            "#,
        )
        .bind(&challenge.id)
        .bind(user_id)
        .bind(&challenge.title)
        .bind(&challenge.description)
        .bind(i64::from(challenge.days_total))
        .bind(i64::from(challenge.days_completed))
        .bind(&challenge.badge_icon)
        .bind(&challenge.color)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn delete_challenge(&self, challenge_id: &str) -> Result<(), StorageError> {
        // Owner lookup is implicit: the user_id column is the secondary
        // index the key-value backend has to emulate by scanning.
        sqlx::query("DELETE FROM challenges WHERE id = ?")
            .bind(challenge_id)
            .execute(self.pool())
            .await?;

        Ok(())
    }
}
