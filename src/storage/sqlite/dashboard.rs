//! SQL-backed dashboard aggregations.

use super::SqliteStore;
use crate::model::{EffortRow, GrowthRow};
use crate::storage::traits::DashboardRepository;
use crate::storage::StorageError;

impl DashboardRepository for SqliteStore {
    async fn aggregate_challenge_effort(&self) -> Result<Vec<EffortRow>, StorageError> {
        let rows: Vec<(String, i64, i64)> = sqlx::query_as(
            r#"
            SELECT u.name,
                   COALESCE(SUM(c.days_completed), 0) AS total_days,
                   COUNT(c.id) AS challenge_count
            FROM users u
            LEFT JOIN challenges c ON c.user_id = u.id
            WHERE u.role = 'STUDENT'
            GROUP BY u.id
            ORDER BY total_days DESC, u.name ASC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(display_name, total, count)| EffortRow {
                display_name,
                total_completed_days: total as u64,
                challenge_count: count as u64,
            })
            .collect())
    }

    async fn aggregate_growth(&self) -> Result<Vec<GrowthRow>, StorageError> {
        let rows: Vec<(String, i64, String)> = sqlx::query_as(
            r#"
            SELECT u.name,
                   (SELECT COUNT(*) FROM course_progress p WHERE p.user_id = u.id)
                       AS completed_count,
                   COALESCE(r.reflection, '') AS reflection_text
            FROM users u
            LEFT JOIN reflections r ON r.user_id = u.id
            WHERE u.role = 'STUDENT'
            ORDER BY completed_count DESC, u.name ASC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(display_name, completed, reflection_text)| GrowthRow {
                display_name,
                course_completion_count: completed as u64,
                reflection_text,
            })
            .collect())
    }
}
