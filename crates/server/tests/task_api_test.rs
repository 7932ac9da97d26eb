//! # Task API Tests
//!
//! Covers `/api/tasks`: listing with mood and title filters, completing tasks
//! for points, and the caller's stats.

mod common;

use anyhow::Result;
use common::TestApp;
use mindscribe_test_utils::task_fixture;
use reqwest::Method;
use serde_json::{json, Value};

#[tokio::test]
async fn test_list_tasks_with_filters() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    for fixture in [
        task_fixture("Evening Walk", 20, &["stress"]),
        task_fixture("Call a Friend", 40, &["loneliness"]),
        task_fixture("Box Breathing", 10, &["Stress"]),
    ] {
        app.app_state.sqlite_provider.create_task(fixture).await?;
    }

    let titles = |tasks: &[Value]| -> Vec<String> {
        tasks
            .iter()
            .filter_map(|t| t["title"].as_str().map(str::to_string))
            .collect()
    };

    // Act
    let all: Vec<Value> = app
        .request_as(Method::GET, "/api/tasks", 1)
        .send()
        .await?
        .json()
        .await?;
    let stress: Vec<Value> = app
        .request_as(Method::GET, "/api/tasks?mood=stress", 1)
        .send()
        .await?
        .json()
        .await?;
    let searched: Vec<Value> = app
        .request_as(Method::GET, "/api/tasks?search=BREATH", 1)
        .send()
        .await?
        .json()
        .await?;

    // Assert
    assert_eq!(
        titles(&all),
        vec!["Call a Friend", "Evening Walk", "Box Breathing"]
    );
    assert_eq!(all[0]["points"], 40);
    assert_eq!(all[0]["moodTags"], json!(["loneliness"]));
    assert_eq!(all[0]["completedAt"], Value::Null);
    assert_eq!(titles(&stress), vec!["Evening Walk", "Box Breathing"]);
    assert_eq!(titles(&searched), vec!["Box Breathing"]);

    Ok(())
}

#[tokio::test]
async fn test_complete_task_and_read_stats() -> Result<()> {
    // Arrange
    let app = TestApp::spawn().await?;
    let response = app
        .request_as(Method::POST, "/api/tasks", 3)
        .json(&json!({ "title": "Journal for five minutes", "points": 25, "moodTags": ["anxiety"] }))
        .send()
        .await?;
    assert_eq!(201, response.status().as_u16());
    let task: Value = response.json().await?;
    let id = task["id"].as_i64().expect("id should be a number");
    let complete_path = format!("/api/tasks/{id}/complete");

    // Act
    let response = app
        .request_as(Method::POST, &complete_path, 3)
        .send()
        .await?;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await?;
    assert_eq!(body["msg"], "Task completed");
    assert_eq!(
        body["updated"],
        json!({ "points": 25, "currentStreak": 1, "longestStreak": 1 })
    );

    let repeat = app
        .request_as(Method::POST, &complete_path, 3)
        .send()
        .await?;
    assert_eq!(400, repeat.status().as_u16());
    let body: Value = repeat.json().await?;
    assert_eq!(body["error"], "Task already completed");

    let stats: Value = app
        .request_as(Method::GET, "/api/tasks/me/stats", 3)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(stats["points"], 25);
    assert_eq!(stats["currentStreak"], 1);
    assert!(stats["lastTaskDate"].is_string());
    assert_eq!(stats["recentCompletions"][0]["taskId"], id);

    // The listing shows the caller's completion, not anyone else's.
    let mine: Vec<Value> = app
        .request_as(Method::GET, "/api/tasks", 3)
        .send()
        .await?
        .json()
        .await?;
    assert!(mine[0]["completedAt"].is_string());
    let theirs: Vec<Value> = app
        .request_as(Method::GET, "/api/tasks", 4)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(theirs[0]["completedAt"], Value::Null);

    Ok(())
}

#[tokio::test]
async fn test_task_errors() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .request_as(Method::POST, "/api/tasks/9999/complete", 1)
        .send()
        .await?;
    assert_eq!(404, response.status().as_u16());
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Task not found");

    let response = app
        .request_as(Method::POST, "/api/tasks/0/complete", 1)
        .send()
        .await?;
    assert_eq!(400, response.status().as_u16());

    let response = app
        .request_as(Method::POST, "/api/tasks", 1)
        .json(&json!({ "title": "  " }))
        .send()
        .await?;
    assert_eq!(400, response.status().as_u16());

    let fresh: Value = app
        .request_as(Method::GET, "/api/tasks/me/stats", 2)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(fresh["points"], 0);
    assert_eq!(fresh["lastTaskDate"], Value::Null);
    assert_eq!(fresh["recentCompletions"], json!([]));

    let response = app.client.get(app.url("/api/tasks")).send().await?;
    assert_eq!(401, response.status().as_u16());

    Ok(())
}
