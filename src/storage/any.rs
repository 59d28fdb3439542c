//! Startup-time backend selection.
//!
//! The repository traits use `impl Future` returns and are therefore not
//! object-safe, so the remote/local choice is an enum rather than a trait
//! object: one `match` per method, static dispatch inside each arm. The
//! variant is fixed when the store is constructed and never changes.

use std::collections::BTreeSet;

use super::local::LocalStore;
use super::sqlite::SqliteStore;
use super::traits::{
    ChallengeRepository, ConfigRepository, CourseRepository, DashboardRepository,
    JournalRepository, UserRepository,
};
use super::StorageError;
use crate::model::{
    Challenge, Course, EffortRow, GrowthRow, HandwritingEntry, RankedCourse, Reflection, User,
};

/// Either of the two interchangeable backends.
#[derive(Clone)]
pub enum AnyBackend {
    Remote(SqliteStore),
    Local(LocalStore),
}

impl AnyBackend {
    pub fn is_remote(&self) -> bool {
        matches!(self, AnyBackend::Remote(_))
    }
}

impl UserRepository for AnyBackend {
    async fn upsert_user(&self, user: &User) -> Result<(), StorageError> {
        match self {
            AnyBackend::Remote(s) => s.upsert_user(user).await,
            AnyBackend::Local(s) => s.upsert_user(user).await,
        }
    }

    async fn load_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        match self {
            AnyBackend::Remote(s) => s.load_user(id).await,
            AnyBackend::Local(s) => s.load_user(id).await,
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        match self {
            AnyBackend::Remote(s) => s.list_users().await,
            AnyBackend::Local(s) => s.list_users().await,
        }
    }
}

impl CourseRepository for AnyBackend {
    async fn add_course(&self, course: &Course) -> Result<(), StorageError> {
        match self {
            AnyBackend::Remote(s) => s.add_course(course).await,
            AnyBackend::Local(s) => s.add_course(course).await,
        }
    }

    async fn remove_course(&self, id: &str) -> Result<(), StorageError> {
        match self {
            AnyBackend::Remote(s) => s.remove_course(id).await,
            AnyBackend::Local(s) => s.remove_course(id).await,
        }
    }

    async fn list_courses(&self) -> Result<Vec<RankedCourse>, StorageError> {
        match self {
            AnyBackend::Remote(s) => s.list_courses().await,
            AnyBackend::Local(s) => s.list_courses().await,
        }
    }

    async fn completed_course_ids(&self, user_id: &str) -> Result<BTreeSet<String>, StorageError> {
        match self {
            AnyBackend::Remote(s) => s.completed_course_ids(user_id).await,
            AnyBackend::Local(s) => s.completed_course_ids(user_id).await,
        }
    }

    async fn set_completion(
        &self,
        user_id: &str,
        course_id: &str,
        completed: bool,
    ) -> Result<(), StorageError> {
        match self {
            AnyBackend::Remote(s) => s.set_completion(user_id, course_id, completed).await,
            AnyBackend::Local(s) => s.set_completion(user_id, course_id, completed).await,
        }
    }
}

impl ChallengeRepository for AnyBackend {
    async fn list_challenges(&self, user_id: &str) -> Result<Vec<Challenge>, StorageError> {
        match self {
            AnyBackend::Remote(s) => s.list_challenges(user_id).await,
            AnyBackend::Local(s) => s.list_challenges(user_id).await,
        }
    }

    async fn upsert_challenge(
        &self,
        user_id: &str,
        challenge: &Challenge,
    ) -> Result<(), StorageError> {
        match self {
            AnyBackend::Remote(s) => s.upsert_challenge(user_id, challenge).await,
            AnyBackend::Local(s) => s.upsert_challenge(user_id, challenge).await,
        }
    }

    async fn delete_challenge(&self, challenge_id: &str) -> Result<(), StorageError> {
        match self {
            AnyBackend::Remote(s) => s.delete_challenge(challenge_id).await,
            AnyBackend::Local(s) => s.delete_challenge(challenge_id).await,
        }
    }
}

impl JournalRepository for AnyBackend {
    async fn load_reflection(&self, user_id: &str) -> Result<Option<Reflection>, StorageError> {
        match self {
            AnyBackend::Remote(s) => s.load_reflection(user_id).await,
            AnyBackend::Local(s) => s.load_reflection(user_id).await,
        }
    }

    async fn save_reflection(
        &self,
        user_id: &str,
        reflection: &Reflection,
    ) -> Result<(), StorageError> {
        match self {
            AnyBackend::Remote(s) => s.save_reflection(user_id, reflection).await,
            AnyBackend::Local(s) => s.save_reflection(user_id, reflection).await,
        }
    }

    async fn list_handwriting(&self, user_id: &str) -> Result<Vec<HandwritingEntry>, StorageError> {
        match self {
            AnyBackend::Remote(s) => s.list_handwriting(user_id).await,
            AnyBackend::Local(s) => s.list_handwriting(user_id).await,
        }
    }

    async fn append_handwriting(
        &self,
        user_id: &str,
        entry: &HandwritingEntry,
    ) -> Result<(), StorageError> {
        match self {
            AnyBackend::Remote(s) => s.append_handwriting(user_id, entry).await,
            AnyBackend::Local(s) => s.append_handwriting(user_id, entry).await,
        }
    }
}

impl ConfigRepository for AnyBackend {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            AnyBackend::Remote(s) => s.get_setting(key).await,
            AnyBackend::Local(s) => s.get_setting(key).await,
        }
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            AnyBackend::Remote(s) => s.put_setting(key, value).await,
            AnyBackend::Local(s) => s.put_setting(key, value).await,
        }
    }
}

impl DashboardRepository for AnyBackend {
    async fn aggregate_challenge_effort(&self) -> Result<Vec<EffortRow>, StorageError> {
        match self {
            AnyBackend::Remote(s) => s.aggregate_challenge_effort().await,
            AnyBackend::Local(s) => s.aggregate_challenge_effort().await,
        }
    }

    async fn aggregate_growth(&self) -> Result<Vec<GrowthRow>, StorageError> {
        match self {
            AnyBackend::Remote(s) => s.aggregate_growth().await,
            AnyBackend::Local(s) => s.aggregate_growth().await,
        }
    }
}
