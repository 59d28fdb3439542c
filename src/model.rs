//! Entity types shared by both storage backends.
//!
//! Everything here is plain data: the local backend persists these as JSON,
//! the relational backend maps them to rows. Derived read-side values
//! (course completion counts, dashboard rows) get their own types instead of
//! optional fields on the stored records.

use serde::{Deserialize, Serialize};

/// Role attached to a user account. Teachers see aggregate dashboards,
/// students own challenges, progress, and journal entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Teacher,
}

impl UserRole {
    /// String form used in the relational schema's CHECK constraint.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::Teacher => "TEACHER",
        }
    }

    /// Decode the schema string form. Unknown values fall back to `Student`;
    /// the column is CHECK-constrained so this only matters for hand-edited
    /// data.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "TEACHER" => UserRole::Teacher,
            _ => UserRole::Student,
        }
    }
}

/// A user account. Created on first login; the id doubles as the display
/// handle in local mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
}

/// An entry in the shared micro-lesson catalog.
///
/// The completion counter is deliberately not a field here: it is derived
/// from `CourseProgress` rows at read time (see [`RankedCourse`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub subject: String,
    /// Display label, e.g. "3:45".
    pub duration: String,
    /// URL or data blob reference.
    pub thumbnail: String,
    pub video_url: Option<String>,
}

/// A course joined with its derived completion count, as returned by the
/// catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCourse {
    pub course: Course,
    /// Number of distinct users who marked the course complete.
    pub completion_count: u64,
}

/// A personal habit challenge. Owned by exactly one user.
///
/// Invariant: `days_completed <= days_total`. The facade clamps on every
/// write, so a record read back from either backend always satisfies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub days_total: u32,
    pub days_completed: u32,
    /// Emoji or icon URL.
    pub badge_icon: String,
    /// UI color tag, stored verbatim.
    pub color: String,
}

impl Challenge {
    /// Whether every target day has been certified.
    pub fn is_complete(&self) -> bool {
        self.days_completed >= self.days_total
    }
}

/// A user's growth narrative. At most one per user; each save fully
/// replaces the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub text: String,
    /// AI-generated teacher-style feedback, if any was attached.
    pub feedback: Option<String>,
}

/// One entry of the weekly "copy this phrase" ritual. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandwritingEntry {
    pub phrase: String,
    /// Unix milliseconds.
    pub created_at: u64,
}

/// Dashboard row: one student's total certified days across all their
/// challenges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffortRow {
    pub display_name: String,
    pub total_completed_days: u64,
    pub challenge_count: u64,
}

/// Dashboard row: one student's completed-course count with their
/// reflection attached (empty string when they have not written one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowthRow {
    pub display_name: String,
    pub course_completion_count: u64,
    pub reflection_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip() {
        assert_eq!(UserRole::from_str_lossy("STUDENT"), UserRole::Student);
        assert_eq!(UserRole::from_str_lossy("TEACHER"), UserRole::Teacher);
        assert_eq!(UserRole::Student.as_str(), "STUDENT");
        assert_eq!(UserRole::Teacher.as_str(), "TEACHER");
    }

    #[test]
    fn role_serializes_as_schema_string() {
        let json = serde_json::to_string(&UserRole::Teacher).unwrap();
        assert_eq!(json, "\"TEACHER\"");
        let back: UserRole = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UserRole::Teacher);
    }

    #[test]
    fn challenge_completion() {
        let mut c = Challenge {
            id: "1".to_string(),
            title: "미라클 모닝 6AM".to_string(),
            description: "아침 6시 기상 인증샷 찍기".to_string(),
            days_total: 30,
            days_completed: 12,
            badge_icon: "🌅".to_string(),
            color: "bg-orange-500".to_string(),
        };
        assert!(!c.is_complete());
        c.days_completed = 30;
        assert!(c.is_complete());
    }
}
