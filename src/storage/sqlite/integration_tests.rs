//! Cross-repository integration tests exercising the relational backend
//! the way the facade drives it.

use super::{Database, SqliteStore};
use crate::model::{Challenge, Course, Reflection, User, UserRole};
use crate::storage::traits::{
    ChallengeRepository, CourseRepository, DashboardRepository, JournalRepository, UserRepository,
};

async fn test_store() -> SqliteStore {
    let db = Database::new_in_memory().await.unwrap();
    SqliteStore::new(&db)
}

fn student(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        role: UserRole::Student,
    }
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
        title: "야자 2시간 순공".to_string(),
        description: "타임랩스 촬영하여 인증".to_string(),
        days_total: total,
        days_completed: done,
        badge_icon: "🔥".to_string(),
        color: "bg-red-500".to_string(),
    }
}

#[tokio::test]
async fn student_progress_shows_up_in_teacher_dashboard() {
    let store = test_store().await;

    store.upsert_user(&student("st1", "Seo")).await.unwrap();
    store.add_course(&course("c1")).await.unwrap();
    store.add_course(&course("c2")).await.unwrap();

    store.set_completion("st1", "c1", true).await.unwrap();
    store.set_completion("st1", "c2", true).await.unwrap();

    let completed = store.completed_course_ids("st1").await.unwrap();
    assert!(completed.contains("c1"));
    assert!(completed.contains("c2"));
    assert_eq!(completed.len(), 2);

    let growth = store.aggregate_growth().await.unwrap();
    let st1 = growth.iter().find(|r| r.display_name == "Seo").unwrap();
    assert_eq!(st1.course_completion_count, 2);
}

#[tokio::test]
async fn challenge_lifecycle() {
    let store = test_store().await;
    store.upsert_user(&student("st1", "Seo")).await.unwrap();

    store
        .upsert_challenge("st1", &challenge("ch1", 14, 0))
        .await
        .unwrap();
    store
        .upsert_challenge("st1", &challenge("ch1", 14, 1))
        .await
        .unwrap();

    let list = store.list_challenges("st1").await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].days_completed, 1);

    let effort = store.aggregate_challenge_effort().await.unwrap();
    assert_eq!(effort[0].total_completed_days, 1);

    store.delete_challenge("ch1").await.unwrap();
    assert!(store.list_challenges("st1").await.unwrap().is_empty());
}

#[tokio::test]
async fn reflection_feeds_growth_rows() {
    let store = test_store().await;
    store.upsert_user(&student("st1", "Seo")).await.unwrap();
    store
        .save_reflection(
            "st1",
            &Reflection {
                text: "이번 학기에 많이 성장했다".to_string(),
                feedback: Some("꾸준함이 보여요 🌱".to_string()),
            },
        )
        .await
        .unwrap();

    let growth = store.aggregate_growth().await.unwrap();
    assert_eq!(growth[0].reflection_text, "이번 학기에 많이 성장했다");
}

#[tokio::test]
async fn catalog_survives_user_churn() {
    let store = test_store().await;
    store.add_course(&course("c1")).await.unwrap();

    // completion marks from users that never logged in still count rows
    store.set_completion("ghost", "c1", true).await.unwrap();
    let ranked = store.list_courses().await.unwrap();
    assert_eq!(ranked[0].completion_count, 1);

    store.set_completion("ghost", "c1", false).await.unwrap();
    let ranked = store.list_courses().await.unwrap();
    assert_eq!(ranked[0].completion_count, 0);
}
