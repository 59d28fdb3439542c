//! Async repository trait definitions for the storage layer.
//!
//! Each trait abstracts over one entity aggregate, allowing the key-value
//! and relational backends to be used interchangeably via static dispatch.
//! [`StorageBackend`] bundles them for the facade.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! the futures are guaranteed `Send` — the facade is handed to tokio tasks
//! by its consumers.

use std::collections::BTreeSet;
use std::future::Future;

use super::StorageError;
use crate::model::{
    Challenge, Course, EffortRow, GrowthRow, HandwritingEntry, RankedCourse, Reflection, User,
};

/// Repository for user accounts.
///
/// `upsert_user` must be idempotent: a second call with the same id replaces
/// name and role in place and leaves exactly one record.
pub trait UserRepository: Send + Sync {
    fn upsert_user(&self, user: &User)
        -> impl Future<Output = Result<(), StorageError>> + Send;
    fn load_user(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<User>, StorageError>> + Send;
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, StorageError>> + Send;
}

/// Repository for the shared course catalog and per-user completion marks.
///
/// `list_courses` returns the catalog ordered by completion count
/// descending, ties broken by reverse-lexicographic course id.
/// `set_completion` must be idempotent in both directions: marking a course
/// complete twice stores one row, clearing an absent mark is a no-op.
pub trait CourseRepository: Send + Sync {
    fn add_course(&self, course: &Course)
        -> impl Future<Output = Result<(), StorageError>> + Send;
    fn remove_course(&self, id: &str)
        -> impl Future<Output = Result<(), StorageError>> + Send;
    fn list_courses(
        &self,
    ) -> impl Future<Output = Result<Vec<RankedCourse>, StorageError>> + Send;
    fn completed_course_ids(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<BTreeSet<String>, StorageError>> + Send;
    fn set_completion(
        &self,
        user_id: &str,
        course_id: &str,
        completed: bool,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Repository for per-user habit challenges.
///
/// `delete_challenge` receives only the challenge id; the backend is
/// responsible for locating the owning user (the relational store has a
/// `user_id` column, the key-value store scans its user index).
pub trait ChallengeRepository: Send + Sync {
    fn list_challenges(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Challenge>, StorageError>> + Send;
    fn upsert_challenge(
        &self,
        user_id: &str,
        challenge: &Challenge,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
    fn delete_challenge(
        &self,
        challenge_id: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Repository for reflections and handwriting logs.
///
/// Reflections are per-user singletons with last-write-wins replace
/// semantics; handwriting logs are append-only and listed newest first.
pub trait JournalRepository: Send + Sync {
    fn load_reflection(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<Reflection>, StorageError>> + Send;
    fn save_reflection(
        &self,
        user_id: &str,
        reflection: &Reflection,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
    fn list_handwriting(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<HandwritingEntry>, StorageError>> + Send;
    fn append_handwriting(
        &self,
        user_id: &str,
        entry: &HandwritingEntry,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Repository for app-level key/value settings (shared sheet URL and the
/// like).
pub trait ConfigRepository: Send + Sync {
    fn get_setting(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;
    fn put_setting(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Cross-user aggregation reads backing the teacher dashboards.
///
/// Both queries cover STUDENT users only and order by the aggregate value
/// descending, ties broken by display name ascending for determinism.
pub trait DashboardRepository: Send + Sync {
    fn aggregate_challenge_effort(
        &self,
    ) -> impl Future<Output = Result<Vec<EffortRow>, StorageError>> + Send;
    fn aggregate_growth(
        &self,
    ) -> impl Future<Output = Result<Vec<GrowthRow>, StorageError>> + Send;
}

/// A complete storage backend: everything the facade needs, in one bound.
pub trait StorageBackend:
    UserRepository
    + CourseRepository
    + ChallengeRepository
    + JournalRepository
    + ConfigRepository
    + DashboardRepository
{
}

impl<T> StorageBackend for T where
    T: UserRepository
        + CourseRepository
        + ChallengeRepository
        + JournalRepository
        + ConfigRepository
        + DashboardRepository
{
}
