//! Namespaced JSON key-value store, one file per key.
//!
//! This is the stand-in for the browser's local storage: a flat namespace
//! of string keys holding JSON values. Keys are only ever built through
//! [`Key`] — nothing in the crate parses a user id back out of a key name,
//! so ids containing delimiters cannot be misread. The aggregation queries
//! iterate the explicit `all_users` index instead of introspecting keys.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::StorageError;

/// Namespace prefix shared by every key, carried over from the original
/// deployment's storage layout.
pub const APP_PREFIX: &str = "school2026_";

/// A key in the store. Per-user keys embed the owning user's id in an
/// escaped, reversible form; the catalog and settings are fixed shared keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    User(&'a str),
    /// Index of every known user id, updated on each user upsert.
    AllUsers,
    Progress(&'a str),
    Challenges(&'a str),
    Reflection(&'a str),
    Handwriting(&'a str),
    /// The shared course catalog.
    Courses,
    /// App-level key/value settings.
    Settings,
}

impl Key<'_> {
    /// Full key name, namespace prefix included.
    pub fn name(&self) -> String {
        match self {
            Key::User(id) => format!("{APP_PREFIX}user_{}", escape_id(id)),
            Key::AllUsers => format!("{APP_PREFIX}all_users"),
            Key::Progress(id) => format!("{APP_PREFIX}progress_{}", escape_id(id)),
            Key::Challenges(id) => format!("{APP_PREFIX}challenges_{}", escape_id(id)),
            Key::Reflection(id) => format!("{APP_PREFIX}reflection_{}", escape_id(id)),
            Key::Handwriting(id) => format!("{APP_PREFIX}handwriting_{}", escape_id(id)),
            Key::Courses => format!("{APP_PREFIX}courses"),
            Key::Settings => format!("{APP_PREFIX}settings"),
        }
    }
}

/// Escape a user id into a filesystem-safe, collision-free form.
///
/// Alphanumerics, `-` and `.` pass through; every other byte (notably `_`,
/// the key delimiter, and path separators) becomes `%XX`. The mapping is
/// injective, so two distinct ids can never produce the same key name.
fn escape_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for b in id.bytes() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'.' => out.push(b as char),
            _ => {
                out.push('%');
                out.push_str(&format!("{b:02X}"));
            }
        }
    }
    out
}

/// JSON-file-per-key persistence store rooted at a directory.
#[derive(Debug, Clone)]
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn file_path(&self, key: &Key<'_>) -> PathBuf {
        self.dir.join(format!("{}.json", key.name()))
    }

    #[cfg(test)]
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Load the value under `key`. Returns `None` if the key was never
    /// written.
    pub fn load<T: DeserializeOwned>(&self, key: &Key<'_>) -> Result<Option<T>, StorageError> {
        let path = self.file_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let value = serde_json::from_str(&contents)?;
        Ok(Some(value))
    }

    /// Load the value under `key`, or its type's default if absent.
    pub fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &Key<'_>,
    ) -> Result<T, StorageError> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Write the value under `key`, replacing any previous value.
    pub fn save<T: Serialize>(&self, key: &Key<'_>, value: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(self.file_path(key), json)?;
        Ok(())
    }

    /// Remove the value under `key`. Removing an absent key is a no-op.
    pub fn remove(&self, key: &Key<'_>) -> Result<(), StorageError> {
        let path = self.file_path(key);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_are_prefixed() {
        assert_eq!(Key::AllUsers.name(), "school2026_all_users");
        assert_eq!(Key::Courses.name(), "school2026_courses");
        assert_eq!(Key::Challenges("s1").name(), "school2026_challenges_s1");
    }

    #[test]
    fn ids_with_delimiters_cannot_collide() {
        // "a_b" must not produce the same key as a literal "a" under a
        // hypothetical "b" suffix, and escaping must itself be injective.
        assert_eq!(Key::User("a_b").name(), "school2026_user_a%5Fb");
        assert_ne!(Key::User("a_b").name(), Key::User("a%5Fb").name());
        assert_ne!(Key::Progress("x").name(), Key::Challenges("x").name());
    }

    #[test]
    fn ids_with_path_separators_are_escaped() {
        let name = Key::User("../evil").name();
        assert!(!name.contains('/'));
        assert!(!name.contains("../"));
    }

    #[test]
    fn save_load_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStore::new(dir.path().to_path_buf());

        let key = Key::Progress("kim");
        assert_eq!(store.load::<Vec<String>>(&key).unwrap(), None);

        store.save(&key, &vec!["c1".to_string()]).unwrap();
        assert_eq!(
            store.load::<Vec<String>>(&key).unwrap(),
            Some(vec!["c1".to_string()])
        );

        store.remove(&key).unwrap();
        assert_eq!(store.load::<Vec<String>>(&key).unwrap(), None);
        // removing again is a no-op
        store.remove(&key).unwrap();
    }

    #[test]
    fn load_or_default_on_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStore::new(dir.path().to_path_buf());
        let list: Vec<String> = store.load_or_default(&Key::Challenges("nobody")).unwrap();
        assert!(list.is_empty());
    }
}
