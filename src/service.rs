//! The storage facade consumed by every screen.
//!
//! One asynchronous API over the five entity kinds plus the two teacher
//! dashboard reads. The backend is chosen once, in [`Storage::connect`],
//! from configuration; after that every call delegates to the injected
//! backend. The single cross-backend path is login: a remote failure there
//! degrades to a locally-scoped session instead of blocking entry.
//!
//! The facade performs no authorization. Role checks (only teachers manage
//! the catalog) are the caller's responsibility; this is a deliberate,
//! documented gap, not an oversight.

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::config::StorageConfig;
use crate::model::{
    Challenge, Course, EffortRow, GrowthRow, HandwritingEntry, RankedCourse, Reflection, User,
    UserRole,
};
use crate::storage::traits::{
    ChallengeRepository, ConfigRepository, CourseRepository, DashboardRepository,
    JournalRepository, UserRepository,
};
use crate::storage::{
    now_millis, AnyBackend, Database, LocalStore, StorageBackend, StorageError,
};
use crate::storage::sqlite::SqliteStore;

/// The persistence facade, generic over the injected backend.
///
/// `login_fallback` is populated only when the backend is remote; it is the
/// local store that login degrades to when the remote one fails.
pub struct StorageService<B> {
    backend: B,
    login_fallback: Option<LocalStore>,
}

/// The facade over the startup-selected backend.
pub type Storage = StorageService<AnyBackend>;

impl Storage {
    /// Select and connect the backend once, from configuration.
    ///
    /// The choice is a pure function of the config: a usable database URL
    /// means remote mode, anything else means local mode. It never changes
    /// for the life of the process.
    pub async fn connect(config: &StorageConfig) -> Result<Storage, StorageError> {
        match config.database_url() {
            Some(url) => {
                let db = Database::connect(url).await?;
                info!(mode = "remote", "storage backend selected");
                Ok(StorageService {
                    backend: AnyBackend::Remote(SqliteStore::new(&db)),
                    login_fallback: Some(LocalStore::new(config.data_dir().clone())),
                })
            }
            None => {
                info!(
                    mode = "local",
                    data_dir = %config.data_dir().display(),
                    "storage backend selected"
                );
                Ok(StorageService {
                    backend: AnyBackend::Local(LocalStore::new(config.data_dir().clone())),
                    login_fallback: None,
                })
            }
        }
    }

    /// Whether the remote backend was selected at startup.
    pub fn is_remote(&self) -> bool {
        self.backend.is_remote()
    }
}

impl<B: StorageBackend> StorageService<B> {
    /// Wrap an already-constructed backend. No login fallback is attached;
    /// use [`Storage::connect`] for the configured dual-mode store.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            login_fallback: None,
        }
    }

    /// Wrap a backend with a local store for login to degrade to.
    pub fn with_login_fallback(backend: B, fallback: LocalStore) -> Self {
        Self {
            backend,
            login_fallback: Some(fallback),
        }
    }

    // ── users ──────────────────────────────────────────────────────────

    /// Log a user in, creating or refreshing their record.
    ///
    /// Never hard-fails on backend unavailability: if the backend errors
    /// and a local fallback is attached, the record is written there and a
    /// degraded, locally-scoped session begins. This is the only operation
    /// with cross-backend fallback.
    pub async fn login_or_create_user(
        &self,
        id: &str,
        name: &str,
        role: UserRole,
    ) -> Result<User, StorageError> {
        if id.trim().is_empty() {
            return Err(StorageError::InvalidInput("empty user id".to_string()));
        }

        let user = User {
            id: id.to_string(),
            name: name.to_string(),
            role,
        };

        match self.backend.upsert_user(&user).await {
            Ok(()) => Ok(user),
            Err(err) => match &self.login_fallback {
                Some(local) => {
                    warn!(error = %err, user_id = %id, "remote login failed, degrading to local session");
                    local.upsert_user(&user).await?;
                    Ok(user)
                }
                None => Err(err),
            },
        }
    }

    /// Look up a user record. `None` for an id that never logged in.
    pub async fn user(&self, id: &str) -> Result<Option<User>, StorageError> {
        self.backend.load_user(id).await
    }

    // ── courses ────────────────────────────────────────────────────────

    /// The shared catalog, most-completed first; equal counts order by
    /// reverse-lexicographic id, which floats the newest course to the top.
    pub async fn list_courses(&self) -> Result<Vec<RankedCourse>, StorageError> {
        self.backend.list_courses().await
    }

    /// Add (or replace, keyed by id) a catalog entry. No role check here;
    /// callers gate this on `UserRole::Teacher`.
    pub async fn add_course(&self, course: &Course) -> Result<(), StorageError> {
        self.backend.add_course(course).await
    }

    /// Remove a catalog entry. No role check here either.
    pub async fn remove_course(&self, course_id: &str) -> Result<(), StorageError> {
        self.backend.remove_course(course_id).await
    }

    /// Ids of the courses this user has marked complete.
    pub async fn completed_course_ids(
        &self,
        user_id: &str,
    ) -> Result<BTreeSet<String>, StorageError> {
        self.backend.completed_course_ids(user_id).await
    }

    /// Mark or clear a completion. Idempotent in both directions.
    pub async fn set_course_completion(
        &self,
        user_id: &str,
        course_id: &str,
        completed: bool,
    ) -> Result<(), StorageError> {
        self.backend
            .set_completion(user_id, course_id, completed)
            .await
    }

    // ── challenges ─────────────────────────────────────────────────────

    pub async fn list_challenges(&self, user_id: &str) -> Result<Vec<Challenge>, StorageError> {
        self.backend.list_challenges(user_id).await
    }

    /// Full-record replace keyed by challenge id, used both for creation
    /// and edits. `days_completed` is clamped to `days_total` so the
    /// stored record always satisfies the challenge invariant.
    pub async fn upsert_challenge(
        &self,
        user_id: &str,
        challenge: &Challenge,
    ) -> Result<(), StorageError> {
        let mut challenge = challenge.clone();
        challenge.days_completed = challenge.days_completed.min(challenge.days_total);
        self.backend.upsert_challenge(user_id, &challenge).await
    }

    /// Record one certification: advance the day counter by one, capped at
    /// the target. Returns the updated challenge, or `None` when the user
    /// has no challenge with that id. Safe to retry; it only ever
    /// increments, and never past the cap.
    pub async fn certify_challenge(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<Option<Challenge>, StorageError> {
        let challenges = self.backend.list_challenges(user_id).await?;
        let Some(mut challenge) = challenges.into_iter().find(|c| c.id == challenge_id) else {
            return Ok(None);
        };

        challenge.days_completed = (challenge.days_completed + 1).min(challenge.days_total);
        self.backend.upsert_challenge(user_id, &challenge).await?;
        Ok(Some(challenge))
    }

    /// Delete a challenge by id alone; the backend locates the owner.
    pub async fn delete_challenge(&self, challenge_id: &str) -> Result<(), StorageError> {
        self.backend.delete_challenge(challenge_id).await
    }

    // ── journal ────────────────────────────────────────────────────────

    /// The user's reflection, or the empty default if none was saved yet.
    pub async fn reflection(&self, user_id: &str) -> Result<Reflection, StorageError> {
        Ok(self
            .backend
            .load_reflection(user_id)
            .await?
            .unwrap_or_default())
    }

    /// Replace the user's reflection wholesale. Last write wins; there is
    /// no history.
    pub async fn save_reflection(
        &self,
        user_id: &str,
        text: &str,
        feedback: Option<&str>,
    ) -> Result<(), StorageError> {
        let reflection = Reflection {
            text: text.to_string(),
            feedback: feedback.map(str::to_string),
        };
        self.backend.save_reflection(user_id, &reflection).await
    }

    /// The user's handwriting ritual log, newest first.
    pub async fn handwriting_logs(
        &self,
        user_id: &str,
    ) -> Result<Vec<HandwritingEntry>, StorageError> {
        self.backend.list_handwriting(user_id).await
    }

    /// Append one handwriting entry, stamped now.
    pub async fn append_handwriting(
        &self,
        user_id: &str,
        phrase: &str,
    ) -> Result<(), StorageError> {
        let entry = HandwritingEntry {
            phrase: phrase.to_string(),
            created_at: now_millis(),
        };
        self.backend.append_handwriting(user_id, &entry).await
    }

    // ── dashboards ─────────────────────────────────────────────────────

    /// Per-student certified-day totals, highest first. No fallback: a
    /// remote failure surfaces so the dashboard can show an error state.
    pub async fn aggregate_challenge_effort(&self) -> Result<Vec<EffortRow>, StorageError> {
        self.backend.aggregate_challenge_effort().await
    }

    /// Per-student completed-course counts with reflections attached,
    /// highest first.
    pub async fn aggregate_growth(&self) -> Result<Vec<GrowthRow>, StorageError> {
        self.backend.aggregate_growth().await
    }

    // ── settings ───────────────────────────────────────────────────────

    pub async fn setting(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend.get_setting(key).await
    }

    pub async fn put_setting(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.put_setting(key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Course;

    fn local_service() -> (tempfile::TempDir, StorageService<LocalStore>) {
        let dir = tempfile::tempdir().unwrap();
        let service = StorageService::new(LocalStore::new(dir.path().to_path_buf()));
        (dir, service)
    }

    fn course(id: &str) -> Course {
        Course {
            id: id.to_string(),
            title: format!("course {id}"),
            subject: "habit".to_string(),
            duration: "3:45".to_string(),
            thumbnail: "thumb.jpg".to_string(),
            video_url: None,
        }
    }

    fn challenge(id: &str, total: u32, done: u32) -> Challenge {
        Challenge {
            id: id.to_string(),
            title: "영단어 50개 암기".to_string(),
            description: "퀴즈 점수 90점 이상 인증".to_string(),
            days_total: total,
            days_completed: done,
            badge_icon: "🧠".to_string(),
            color: "bg-blue-500".to_string(),
        }
    }

    #[tokio::test]
    async fn login_upserts_in_place() {
        let (_dir, service) = local_service();
        service
            .login_or_create_user("s1", "Kim", UserRole::Student)
            .await
            .unwrap();
        let user = service
            .login_or_create_user("s1", "Kim Updated", UserRole::Teacher)
            .await
            .unwrap();
        assert_eq!(user.name, "Kim Updated");

        let stored = service.user("s1").await.unwrap().unwrap();
        assert_eq!(stored.name, "Kim Updated");
        assert_eq!(stored.role, UserRole::Teacher);
    }

    #[tokio::test]
    async fn login_rejects_blank_id() {
        let (_dir, service) = local_service();
        let err = service
            .login_or_create_user("   ", "Kim", UserRole::Student)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn certify_advances_and_caps() {
        let (_dir, service) = local_service();
        service
            .upsert_challenge("s1", &challenge("x", 5, 4))
            .await
            .unwrap();

        let updated = service.certify_challenge("s1", "x").await.unwrap().unwrap();
        assert_eq!(updated.days_completed, 5);
        assert!(updated.is_complete());

        // already at the target: certifying again stays capped
        let again = service.certify_challenge("s1", "x").await.unwrap().unwrap();
        assert_eq!(again.days_completed, 5);
    }

    #[tokio::test]
    async fn certify_unknown_challenge_is_none() {
        let (_dir, service) = local_service();
        assert_eq!(service.certify_challenge("s1", "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn upsert_clamps_overshooting_day_count() {
        let (_dir, service) = local_service();
        service
            .upsert_challenge("s1", &challenge("x", 5, 99))
            .await
            .unwrap();
        let list = service.list_challenges("s1").await.unwrap();
        assert_eq!(list[0].days_completed, 5);
    }

    #[tokio::test]
    async fn reflection_defaults_to_empty() {
        let (_dir, service) = local_service();
        let r = service.reflection("brand-new-user").await.unwrap();
        assert_eq!(r, Reflection::default());
    }

    #[tokio::test]
    async fn end_to_end_student_to_teacher_view() {
        let (_dir, service) = local_service();
        service
            .login_or_create_user("st1", "Seo", UserRole::Student)
            .await
            .unwrap();
        service.add_course(&course("c1")).await.unwrap();
        service.add_course(&course("c2")).await.unwrap();

        service.set_course_completion("st1", "c1", true).await.unwrap();
        service.set_course_completion("st1", "c2", true).await.unwrap();

        let completed = service.completed_course_ids("st1").await.unwrap();
        assert_eq!(
            completed,
            ["c1", "c2"].iter().map(|s| s.to_string()).collect()
        );

        let growth = service.aggregate_growth().await.unwrap();
        let st1 = growth.iter().find(|r| r.display_name == "Seo").unwrap();
        assert_eq!(st1.course_completion_count, 2);
    }

    #[tokio::test]
    async fn append_handwriting_stamps_and_lists_newest_first() {
        let (_dir, service) = local_service();
        service.append_handwriting("s1", "작은 습관").await.unwrap();
        service.append_handwriting("s1", "큰 성장").await.unwrap();

        let logs = service.handwriting_logs("s1").await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].phrase, "큰 성장");
        assert!(logs[0].created_at > 0);
    }

    // ── login fallback ─────────────────────────────────────────────────

    /// Backend whose every operation reports the remote store unreachable.
    struct UnreachableBackend;

    fn unreachable() -> StorageError {
        StorageError::BackendUnavailable("connection refused".to_string())
    }

    impl UserRepository for UnreachableBackend {
        async fn upsert_user(&self, _: &User) -> Result<(), StorageError> {
            Err(unreachable())
        }
        async fn load_user(&self, _: &str) -> Result<Option<User>, StorageError> {
            Err(unreachable())
        }
        async fn list_users(&self) -> Result<Vec<User>, StorageError> {
            Err(unreachable())
        }
    }

    impl CourseRepository for UnreachableBackend {
        async fn add_course(&self, _: &Course) -> Result<(), StorageError> {
            Err(unreachable())
        }
        async fn remove_course(&self, _: &str) -> Result<(), StorageError> {
            Err(unreachable())
        }
        async fn list_courses(&self) -> Result<Vec<RankedCourse>, StorageError> {
            Err(unreachable())
        }
        async fn completed_course_ids(&self, _: &str) -> Result<BTreeSet<String>, StorageError> {
            Err(unreachable())
        }
        async fn set_completion(&self, _: &str, _: &str, _: bool) -> Result<(), StorageError> {
            Err(unreachable())
        }
    }

    impl ChallengeRepository for UnreachableBackend {
        async fn list_challenges(&self, _: &str) -> Result<Vec<Challenge>, StorageError> {
            Err(unreachable())
        }
        async fn upsert_challenge(&self, _: &str, _: &Challenge) -> Result<(), StorageError> {
            Err(unreachable())
        }
        async fn delete_challenge(&self, _: &str) -> Result<(), StorageError> {
            Err(unreachable())
        }
    }

    impl JournalRepository for UnreachableBackend {
        async fn load_reflection(&self, _: &str) -> Result<Option<Reflection>, StorageError> {
            Err(unreachable())
        }
        async fn save_reflection(&self, _: &str, _: &Reflection) -> Result<(), StorageError> {
            Err(unreachable())
        }
        async fn list_handwriting(&self, _: &str) -> Result<Vec<HandwritingEntry>, StorageError> {
            Err(unreachable())
        }
        async fn append_handwriting(
            &self,
            _: &str,
            _: &HandwritingEntry,
        ) -> Result<(), StorageError> {
            Err(unreachable())
        }
    }

    impl ConfigRepository for UnreachableBackend {
        async fn get_setting(&self, _: &str) -> Result<Option<String>, StorageError> {
            Err(unreachable())
        }
        async fn put_setting(&self, _: &str, _: &str) -> Result<(), StorageError> {
            Err(unreachable())
        }
    }

    impl DashboardRepository for UnreachableBackend {
        async fn aggregate_challenge_effort(&self) -> Result<Vec<EffortRow>, StorageError> {
            Err(unreachable())
        }
        async fn aggregate_growth(&self) -> Result<Vec<GrowthRow>, StorageError> {
            Err(unreachable())
        }
    }

    #[tokio::test]
    async fn login_degrades_to_local_when_remote_fails() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStore::new(dir.path().to_path_buf());
        let service = StorageService::with_login_fallback(UnreachableBackend, local.clone());

        let user = service
            .login_or_create_user("s1", "Kim", UserRole::Student)
            .await
            .unwrap();
        assert_eq!(user.id, "s1");

        // the degraded session's record landed in the local store
        let stored = local.load_user("s1").await.unwrap().unwrap();
        assert_eq!(stored.name, "Kim");
    }

    #[tokio::test]
    async fn only_login_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStore::new(dir.path().to_path_buf());
        let service = StorageService::with_login_fallback(UnreachableBackend, local);

        let err = service.aggregate_growth().await.unwrap_err();
        assert!(matches!(err, StorageError::BackendUnavailable(_)));

        let err = service
            .set_course_completion("s1", "c1", true)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::BackendUnavailable(_)));
    }

    #[tokio::test]
    async fn login_without_fallback_propagates() {
        let service = StorageService::new(UnreachableBackend);
        let err = service
            .login_or_create_user("s1", "Kim", UserRole::Student)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::BackendUnavailable(_)));
    }

    // ── startup selection ──────────────────────────────────────────────

    #[tokio::test]
    async fn connect_selects_local_for_placeholder_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::with_database_url(
            "sqlite:your-database.db",
            dir.path().to_path_buf(),
        );
        let storage = Storage::connect(&config).await.unwrap();
        assert!(!storage.is_remote());
    }

    #[tokio::test]
    async fn connect_selects_remote_for_real_url() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("app.db").display());
        let config = StorageConfig::with_database_url(url, dir.path().to_path_buf());
        let storage = Storage::connect(&config).await.unwrap();
        assert!(storage.is_remote());

        // the remote path is fully usable end to end
        storage
            .login_or_create_user("st1", "Seo", UserRole::Student)
            .await
            .unwrap();
        storage.add_course(&course("c1")).await.unwrap();
        storage
            .set_course_completion("st1", "c1", true)
            .await
            .unwrap();
        let ranked = storage.list_courses().await.unwrap();
        assert_eq!(ranked[0].completion_count, 1);
    }
}
