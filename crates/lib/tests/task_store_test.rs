//! # Task Store Tests
//!
//! Task catalogue, completions and the points and streak bookkeeping of the
//! `SqliteProvider`, on isolated in-memory databases.

mod common;

use crate::common::setup_provider;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use mindscribe::{
    types::{NewTask, TaskFilter},
    StoreError,
};

fn task(title: &str, points: i64, moods: &[&str]) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: None,
        points: Some(points),
        mood_tags: moods.iter().map(|m| m.to_string()).collect(),
    }
}

fn morning(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, day, 9, 0, 0).unwrap()
}

#[tokio::test]
async fn test_create_task_defaults_and_validation() {
    let provider = setup_provider().await;

    let created = provider
        .create_task(NewTask {
            title: "Drink water".to_string(),
            mood_tags: vec![" Tired".to_string()],
            ..Default::default()
        })
        .await
        .expect("Create failed");
    assert_eq!(created.points, 10);
    assert_eq!(created.mood_tags, vec!["tired"]);
    assert_eq!(
        provider.get_task(created.id).await.expect("Get failed"),
        Some(created)
    );

    let err = provider.create_task(task(" ", 5, &[])).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    let err = provider.create_task(task("Walk", -3, &[])).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn test_list_tasks_orders_filters_and_marks_completion() {
    // 1. Arrange
    let provider = setup_provider().await;
    let walk = provider
        .create_task(task("Evening Walk", 20, &["stress", "sleep"]))
        .await
        .expect("Create failed");
    provider
        .create_task(task("Gratitude List", 30, &["sadness"]))
        .await
        .expect("Create failed");
    provider
        .create_task(task("Box Breathing", 10, &["stress"]))
        .await
        .expect("Create failed");
    provider
        .complete_task_at(1, walk.id, morning(1))
        .await
        .expect("Complete failed");

    // 2. Act
    let all = provider
        .list_tasks(1, &TaskFilter::default())
        .await
        .expect("List failed");
    let stress = provider
        .list_tasks(
            1,
            &TaskFilter {
                mood: Some("STRESS".to_string()),
                search: None,
            },
        )
        .await
        .expect("List failed");
    let searched = provider
        .list_tasks(
            2,
            &TaskFilter {
                mood: Some("stress".to_string()),
                search: Some("walk".to_string()),
            },
        )
        .await
        .expect("List failed");

    // 3. Assert
    let titles: Vec<&str> = all.iter().map(|l| l.task.title.as_str()).collect();
    assert_eq!(titles, vec!["Gratitude List", "Evening Walk", "Box Breathing"]);
    assert_eq!(all[1].completed_at, Some(morning(1)));
    assert!(all[0].completed_at.is_none());

    let titles: Vec<&str> = stress.iter().map(|l| l.task.title.as_str()).collect();
    assert_eq!(titles, vec!["Evening Walk", "Box Breathing"]);

    assert_eq!(searched.len(), 1);
    assert!(searched[0].completed_at.is_none(), "Completions are per user.");
}

#[tokio::test]
async fn test_complete_task_awards_points_and_tracks_streaks() {
    let provider = setup_provider().await;
    let mut ids = Vec::new();
    for (i, points) in [10, 15, 20, 25, 5].into_iter().enumerate() {
        let created = provider
            .create_task(task(&format!("Task {i}"), points, &[]))
            .await
            .expect("Create failed");
        ids.push(created.id);
    }

    let day1 = provider.complete_task_at(4, ids[0], morning(1)).await.expect("Complete failed");
    assert_eq!((day1.points, day1.current_streak, day1.longest_streak), (10, 1, 1));

    let day2 = provider.complete_task_at(4, ids[1], morning(2)).await.expect("Complete failed");
    assert_eq!((day2.points, day2.current_streak, day2.longest_streak), (25, 2, 2));

    // Same day: points only.
    let day2_again = provider
        .complete_task_at(4, ids[2], morning(2) + Duration::hours(8))
        .await
        .expect("Complete failed");
    assert_eq!(
        (day2_again.points, day2_again.current_streak, day2_again.longest_streak),
        (45, 2, 2)
    );

    // A skipped day resets the current streak.
    let day4 = provider.complete_task_at(4, ids[3], morning(4)).await.expect("Complete failed");
    assert_eq!((day4.points, day4.current_streak, day4.longest_streak), (70, 1, 2));
    assert_eq!(day4.last_task_date, NaiveDate::from_ymd_opt(2025, 5, 4));

    let stats = provider.get_task_stats(4).await.expect("Stats failed");
    assert_eq!(stats.progress, day4);
    let completed: Vec<i64> = stats.recent_completions.iter().map(|c| c.task_id).collect();
    assert_eq!(completed, vec![ids[3], ids[2], ids[1], ids[0]]);

    // Other users start from zero.
    let fresh = provider.get_task_stats(5).await.expect("Stats failed");
    assert_eq!(fresh.progress.points, 0);
    assert!(fresh.recent_completions.is_empty());
}

#[tokio::test]
async fn test_complete_task_rejects_repeats_and_unknown_tasks() {
    let provider = setup_provider().await;
    let created = provider
        .create_task(task("Stretch", 10, &[]))
        .await
        .expect("Create failed");
    provider
        .complete_task_at(6, created.id, morning(1))
        .await
        .expect("Complete failed");

    let err = provider
        .complete_task_at(6, created.id, morning(2))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(msg) if msg == "Task already completed"));

    // The rejected repeat left the score untouched.
    let stats = provider.get_task_stats(6).await.expect("Stats failed");
    assert_eq!(stats.progress.points, 10);
    assert_eq!(stats.recent_completions.len(), 1);

    let err = provider.complete_task(6, 9999).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}
