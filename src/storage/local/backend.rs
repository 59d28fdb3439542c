//! Key-value implementation of the storage backend.
//!
//! Every entity maps onto the namespaced keys described in [`super::kv`].
//! Cross-user reads (the dashboard aggregations, challenge deletion by id)
//! walk the explicit `all_users` index rather than enumerating raw keys.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use super::kv::{Key, KvStore};
use crate::model::{
    Challenge, Course, EffortRow, GrowthRow, HandwritingEntry, RankedCourse, Reflection, User,
    UserRole,
};
use crate::storage::traits::{
    ChallengeRepository, ConfigRepository, CourseRepository, DashboardRepository,
    JournalRepository, UserRepository,
};
use crate::storage::StorageError;

/// Local (per-installation) storage backend over a [`KvStore`].
#[derive(Debug, Clone)]
pub struct LocalStore {
    kv: KvStore,
}

impl LocalStore {
    /// Create a store rooted at `data_dir`. The directory is created lazily
    /// on first write.
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            kv: KvStore::new(data_dir),
        }
    }

    fn user_index(&self) -> Result<BTreeSet<String>, StorageError> {
        self.kv.load_or_default(&Key::AllUsers)
    }

    /// Every known user, skipping index entries whose record went missing.
    fn known_users(&self) -> Result<Vec<User>, StorageError> {
        let mut users = Vec::new();
        for id in self.user_index()? {
            match self.kv.load::<User>(&Key::User(&id))? {
                Some(user) => users.push(user),
                None => {
                    tracing::warn!(user_id = %id, "user index entry without a record, skipping");
                }
            }
        }
        Ok(users)
    }

    fn progress(&self, user_id: &str) -> Result<BTreeSet<String>, StorageError> {
        self.kv.load_or_default(&Key::Progress(user_id))
    }

    fn challenges(&self, user_id: &str) -> Result<Vec<Challenge>, StorageError> {
        self.kv.load_or_default(&Key::Challenges(user_id))
    }
}

impl UserRepository for LocalStore {
    async fn upsert_user(&self, user: &User) -> Result<(), StorageError> {
        self.kv.save(&Key::User(&user.id), user)?;
        let mut index = self.user_index()?;
        if index.insert(user.id.clone()) {
            self.kv.save(&Key::AllUsers, &index)?;
        }
        Ok(())
    }

    async fn load_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        self.kv.load(&Key::User(id))
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        self.known_users()
    }
}

impl CourseRepository for LocalStore {
    async fn add_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut catalog: Vec<Course> = self.kv.load_or_default(&Key::Courses)?;
        match catalog.iter_mut().find(|c| c.id == course.id) {
            Some(existing) => *existing = course.clone(),
            None => catalog.push(course.clone()),
        }
        self.kv.save(&Key::Courses, &catalog)
    }

    async fn remove_course(&self, id: &str) -> Result<(), StorageError> {
        let mut catalog: Vec<Course> = self.kv.load_or_default(&Key::Courses)?;
        catalog.retain(|c| c.id != id);
        self.kv.save(&Key::Courses, &catalog)
    }

    async fn list_courses(&self) -> Result<Vec<RankedCourse>, StorageError> {
        let catalog: Vec<Course> = self.kv.load_or_default(&Key::Courses)?;

        // Full scan over every user's completed set. O(courses × users),
        // acceptable at classroom scale.
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for user_id in self.user_index()? {
            for course_id in self.progress(&user_id)? {
                *counts.entry(course_id).or_default() += 1;
            }
        }

        let mut ranked: Vec<RankedCourse> = catalog
            .into_iter()
            .map(|course| {
                let completion_count = counts.get(&course.id).copied().unwrap_or(0);
                RankedCourse {
                    course,
                    completion_count,
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.completion_count
                .cmp(&a.completion_count)
                .then_with(|| b.course.id.cmp(&a.course.id))
        });
        Ok(ranked)
    }

    async fn completed_course_ids(&self, user_id: &str) -> Result<BTreeSet<String>, StorageError> {
        self.progress(user_id)
    }

    async fn set_completion(
        &self,
        user_id: &str,
        course_id: &str,
        completed: bool,
    ) -> Result<(), StorageError> {
        let mut progress = self.progress(user_id)?;
        let changed = if completed {
            progress.insert(course_id.to_string())
        } else {
            progress.remove(course_id)
        };
        if changed {
            self.kv.save(&Key::Progress(user_id), &progress)?;
        }
        Ok(())
    }
}

impl ChallengeRepository for LocalStore {
    async fn list_challenges(&self, user_id: &str) -> Result<Vec<Challenge>, StorageError> {
        self.challenges(user_id)
    }

    async fn upsert_challenge(
        &self,
        user_id: &str,
        challenge: &Challenge,
    ) -> Result<(), StorageError> {
        let mut list = self.challenges(user_id)?;
        match list.iter_mut().find(|c| c.id == challenge.id) {
            Some(existing) => *existing = challenge.clone(),
            None => list.push(challenge.clone()),
        }
        self.kv.save(&Key::Challenges(user_id), &list)
    }

    async fn delete_challenge(&self, challenge_id: &str) -> Result<(), StorageError> {
        // The key-value layout has no id → owner index, so walk the user
        // index until the owning collection is found. Other users'
        // collections are left untouched.
        for user_id in self.user_index()? {
            let mut list = self.challenges(&user_id)?;
            let before = list.len();
            list.retain(|c| c.id != challenge_id);
            if list.len() != before {
                self.kv.save(&Key::Challenges(&user_id), &list)?;
                return Ok(());
            }
        }
        Ok(())
    }
}

impl JournalRepository for LocalStore {
    async fn load_reflection(&self, user_id: &str) -> Result<Option<Reflection>, StorageError> {
        self.kv.load(&Key::Reflection(user_id))
    }

    async fn save_reflection(
        &self,
        user_id: &str,
        reflection: &Reflection,
    ) -> Result<(), StorageError> {
        self.kv.save(&Key::Reflection(user_id), reflection)
    }

    async fn list_handwriting(&self, user_id: &str) -> Result<Vec<HandwritingEntry>, StorageError> {
        let mut logs: Vec<HandwritingEntry> =
            self.kv.load_or_default(&Key::Handwriting(user_id))?;
        // Stored in append order; newest first for callers.
        logs.reverse();
        Ok(logs)
    }

    async fn append_handwriting(
        &self,
        user_id: &str,
        entry: &HandwritingEntry,
    ) -> Result<(), StorageError> {
        let mut logs: Vec<HandwritingEntry> =
            self.kv.load_or_default(&Key::Handwriting(user_id))?;
        logs.push(entry.clone());
        self.kv.save(&Key::Handwriting(user_id), &logs)
    }
}

impl ConfigRepository for LocalStore {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StorageError> {
        let settings: BTreeMap<String, String> = self.kv.load_or_default(&Key::Settings)?;
        Ok(settings.get(key).cloned())
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut settings: BTreeMap<String, String> = self.kv.load_or_default(&Key::Settings)?;
        settings.insert(key.to_string(), value.to_string());
        self.kv.save(&Key::Settings, &settings)
    }
}

impl DashboardRepository for LocalStore {
    async fn aggregate_challenge_effort(&self) -> Result<Vec<EffortRow>, StorageError> {
        let mut rows = Vec::new();
        for user in self.known_users()? {
            if user.role != UserRole::Student {
                continue;
            }
            let challenges = self.challenges(&user.id)?;
            rows.push(EffortRow {
                display_name: user.name,
                total_completed_days: challenges
                    .iter()
                    .map(|c| u64::from(c.days_completed))
                    .sum(),
                challenge_count: challenges.len() as u64,
            });
        }
        rows.sort_by(|a, b| {
            b.total_completed_days
                .cmp(&a.total_completed_days)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        Ok(rows)
    }

    async fn aggregate_growth(&self) -> Result<Vec<GrowthRow>, StorageError> {
        let mut rows = Vec::new();
        for user in self.known_users()? {
            if user.role != UserRole::Student {
                continue;
            }
            let completed = self.progress(&user.id)?;
            let reflection: Option<Reflection> = self.kv.load(&Key::Reflection(&user.id))?;
            rows.push(GrowthRow {
                display_name: user.name,
                course_completion_count: completed.len() as u64,
                reflection_text: reflection.map(|r| r.text).unwrap_or_default(),
            });
        }
        rows.sort_by(|a, b| {
            b.course_completion_count
                .cmp(&a.course_completion_count)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        Ok(rows)
    }
}
