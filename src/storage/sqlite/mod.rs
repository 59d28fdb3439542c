//! Relational backend implementations.
//!
//! ## Database setup
//!
//! [`Database`] wraps a `sqlx::SqlitePool` configured with:
//! - **WAL mode** — one writer, multiple concurrent readers.
//! - **Embedded migrations** — `sqlx::migrate!` runs
//!   `migrations/001_initial_schema.sql` automatically on
//!   [`Database::connect`]. The schema is idempotent.
//!
//! ## Store type
//!
//! [`SqliteStore`] holds the pool and implements every repository trait from
//! [`crate::storage::traits`], one trait per source file:
//!
//! | File | Trait |
//! |------|-------|
//! | `users.rs` | `UserRepository` |
//! | `courses.rs` | `CourseRepository` |
//! | `challenges.rs` | `ChallengeRepository` |
//! | `journal.rs` | `JournalRepository` |
//! | `settings.rs` | `ConfigRepository` |
//! | `dashboard.rs` | `DashboardRepository` |
//!
//! Upserts use `INSERT … ON CONFLICT … DO UPDATE` keyed by primary key;
//! completion counts and both dashboard aggregations are GROUP BY queries
//! with `ORDER BY … DESC` matching the facade's documented ordering.

mod challenges;
mod courses;
mod dashboard;
mod database;
#[cfg(test)]
mod integration_tests;
mod journal;
mod settings;
mod users;

pub use database::Database;

/// Relational implementation of the storage backend. Cheap to clone; all
/// clones share the same pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: sqlx::SqlitePool,
}

impl SqliteStore {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub(crate) fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }
}
