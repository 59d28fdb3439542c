//! SQL-backed repository for the course catalog and completion marks.

use std::collections::BTreeSet;

use super::SqliteStore;
use crate::model::{Course, RankedCourse};
use crate::storage::traits::CourseRepository;
use crate::storage::StorageError;

impl CourseRepository for SqliteStore {
    async fn add_course(&self, course: &Course) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, title, subject, duration, thumbnail, video_url)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                subject = excluded.subject,
                duration = excluded.duration,
                thumbnail = excluded.thumbnail,
                video_url = excluded.video_url
            "#,
        )
        .bind(&course.id)
        .bind(&course.title)
        .bind(&course.subject)
        .bind(&course.duration)
        .bind(&course.thumbnail)
        .bind(&course.video_url)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn remove_course(&self, id: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    async fn list_courses(&self) -> Result<Vec<RankedCourse>, StorageError> {
        let rows: Vec<(String, String, String, String, String, Option<String>, i64)> =
            sqlx::query_as(
                r#"
                SELECT c.id, c.title, c.subject, c.duration, c.thumbnail, c.video_url,
                       COUNT(p.user_id) AS completion_count
                FROM courses c
                LEFT JOIN course_progress p ON p.course_id = c.id
                GROUP BY c.id
                ORDER BY completion_count DESC, c.id DESC
                "#,
            )
            .fetch_all(self.pool())
            .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, title, subject, duration, thumbnail, video_url, completion_count)| {
                    RankedCourse {
                        course: Course {
                            id,
                            title,
                            subject,
                            duration,
                            thumbnail,
                            video_url,
                        },
                        completion_count: completion_count as u64,
                    }
                },
            )
            .collect())
    }

    async fn completed_course_ids(&self, user_id: &str) -> Result<BTreeSet<String>, StorageError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT course_id FROM course_progress WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(self.pool())
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn set_completion(
        &self,
        user_id: &str,
        course_id: &str,
        completed: bool,
    ) -> Result<(), StorageError> {
        if completed {
            sqlx::query(
                r#"
                INSERT INTO course_progress (user_id, course_id, completed)
                VALUES (?, ?, 1)
                ON CONFLICT(user_id, course_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(course_id)
            .execute(self.pool())
            .await?;
        } else {
            sqlx::query("DELETE FROM course_progress WHERE user_id = ? AND course_id = ?")
                .bind(user_id)
                .bind(course_id)
                .execute(self.pool())
                .await?;
        }

        Ok(())
    }
}
