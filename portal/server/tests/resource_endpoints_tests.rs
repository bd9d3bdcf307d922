use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

mod common;

use common::{admin_token, send, setup, volunteer_token};

async fn create(app: axum::Router, uri: &str, body: Value) -> Value {
    let (status, created) = send(app, Method::POST, uri, Some(&admin_token()), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "creating via {uri}: {created}");
    created
}

#[tokio::test]
async fn volunteer_routes_are_admin_only() {
    let ctx = setup().await.expect("Failed to setup test context");

    let (anonymous, anonymous_body) =
        send(ctx.app(), Method::GET, "/api/volunteers", None, None).await;
    let (volunteer, volunteer_body) = send(
        ctx.app(),
        Method::GET,
        "/api/volunteers",
        Some(&volunteer_token("v-1")),
        None,
    )
    .await;
    let (garbage, garbage_body) =
        send(ctx.app(), Method::GET, "/api/volunteers", Some("garbage"), None).await;

    assert_eq!(anonymous, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous_body, json!({"error": "Token is missing"}));
    assert_eq!(volunteer, StatusCode::FORBIDDEN);
    assert_eq!(volunteer_body, json!({"error": "Admin access required"}));
    assert_eq!(garbage, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage_body, json!({"error": "Invalid token"}));
}

#[tokio::test]
async fn volunteer_lifecycle() {
    // Arrange
    let ctx = setup().await.expect("Failed to setup test context");
    let admin = admin_token();

    // Act
    let created = create(
        ctx.app(),
        "/api/volunteers",
        json!({"name": "Asha", "email": "asha@portal.test", "phone": "98200", "skills": "teaching"}),
    )
    .await;
    let id = created["_id"].as_str().unwrap().to_string();
    let (update_status, updated) = send(
        ctx.app(),
        Method::PUT,
        &format!("/api/volunteers/{id}"),
        Some(&admin),
        Some(json!({"status": "inactive"})),
    )
    .await;
    let (delete_status, deleted) = send(
        ctx.app(),
        Method::DELETE,
        &format!("/api/volunteers/{id}"),
        Some(&admin),
        None,
    )
    .await;
    let (_, remaining) = send(ctx.app(), Method::GET, "/api/volunteers", Some(&admin), None).await;

    // Assert
    assert_eq!(created["hours"], 0.0);
    assert_eq!(created["status"], "active");
    assert_eq!(created["skills"], "teaching");
    assert_eq!(update_status, StatusCode::OK);
    assert_eq!(updated["status"], "inactive");
    assert_eq!(updated["name"], "Asha");
    assert_eq!(delete_status, StatusCode::OK);
    assert_eq!(deleted, json!({"message": format!("Volunteer {id} deleted")}));
    assert_eq!(remaining, json!([]));
}

#[tokio::test]
async fn blank_required_field_is_rejected() {
    let ctx = setup().await.expect("Failed to setup test context");

    let (status, body) = send(
        ctx.app(),
        Method::POST,
        "/api/volunteers",
        Some(&admin_token()),
        Some(json!({"name": "Asha", "email": " ", "phone": "98200"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "email is required"}));
}

#[tokio::test]
async fn missing_records_answer_not_found() {
    let ctx = setup().await.expect("Failed to setup test context");
    let admin = admin_token();

    let (volunteer, volunteer_body) = send(
        ctx.app(),
        Method::DELETE,
        "/api/volunteers/nope",
        Some(&admin),
        None,
    )
    .await;
    let (event, event_body) = send(
        ctx.app(),
        Method::PUT,
        "/api/events/nope",
        Some(&admin),
        Some(json!({"name": "Renamed"})),
    )
    .await;
    let (task, task_body) = send(
        ctx.app(),
        Method::PATCH,
        "/api/tasks/nope",
        Some(&admin),
        Some(json!({"status": "completed"})),
    )
    .await;

    assert_eq!(volunteer, StatusCode::NOT_FOUND);
    assert_eq!(volunteer_body, json!({"error": "Volunteer not found"}));
    assert_eq!(event, StatusCode::NOT_FOUND);
    assert_eq!(event_body, json!({"error": "Event not found"}));
    assert_eq!(task, StatusCode::NOT_FOUND);
    assert_eq!(task_body, json!({"error": "Task not found"}));
}

#[tokio::test]
async fn volunteers_read_events_but_cannot_create_them() {
    let ctx = setup().await.expect("Failed to setup test context");
    let created = create(
        ctx.app(),
        "/api/events",
        json!({
            "name": "Book Drive",
            "date": "2025-10-20",
            "location": "Pune",
            "requiredVolunteers": 12
        }),
    )
    .await;
    let token = volunteer_token("v-1");

    let (list_status, events) =
        send(ctx.app(), Method::GET, "/api/events", Some(&token), None).await;
    let (create_status, _) = send(
        ctx.app(),
        Method::POST,
        "/api/events",
        Some(&token),
        Some(json!({"name": "x", "date": "2025-10-21", "location": "y"})),
    )
    .await;

    assert_eq!(created["status"], "upcoming");
    assert_eq!(created["requiredVolunteers"], 12);
    assert_eq!(list_status, StatusCode::OK);
    assert_eq!(events.as_array().map(Vec::len), Some(1));
    assert_eq!(events[0]["name"], "Book Drive");
    assert_eq!(create_status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn volunteer_can_move_a_task_but_not_delete_it() {
    // Arrange
    let ctx = setup().await.expect("Failed to setup test context");
    let created = create(
        ctx.app(),
        "/api/tasks",
        json!({
            "eventId": "e-1",
            "volunteerId": "v-1",
            "title": "Sort donated books",
            "priority": "high"
        }),
    )
    .await;
    let id = created["_id"].as_str().unwrap().to_string();
    let token = volunteer_token("v-1");

    // Act
    let (patch_status, patched) = send(
        ctx.app(),
        Method::PATCH,
        &format!("/api/tasks/{id}"),
        Some(&token),
        Some(json!({"status": "in-progress"})),
    )
    .await;
    let (delete_status, _) = send(
        ctx.app(),
        Method::DELETE,
        &format!("/api/tasks/{id}"),
        Some(&token),
        None,
    )
    .await;
    let (admin_delete_status, admin_deleted) = send(
        ctx.app(),
        Method::DELETE,
        &format!("/api/tasks/{id}"),
        Some(&admin_token()),
        None,
    )
    .await;

    // Assert
    assert_eq!(created["status"], "pending");
    assert_eq!(created["volunteerId"], "v-1");
    assert_eq!(patch_status, StatusCode::OK);
    assert_eq!(patched["status"], "in-progress");
    assert_eq!(patched["priority"], "high");
    assert_eq!(delete_status, StatusCode::FORBIDDEN);
    assert_eq!(admin_delete_status, StatusCode::OK);
    assert_eq!(admin_deleted, json!({"message": format!("Task {id} deleted")}));
}

#[tokio::test]
async fn task_requires_a_title() {
    let ctx = setup().await.expect("Failed to setup test context");

    let (status, body) = send(
        ctx.app(),
        Method::POST,
        "/api/tasks",
        Some(&admin_token()),
        Some(json!({"eventId": "e-1", "volunteerId": "v-1", "title": ""})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "title is required"}));
}

#[tokio::test]
async fn service_banner_and_health_are_public() {
    let ctx = setup().await.expect("Failed to setup test context");

    let (banner_status, banner) = send(ctx.app(), Method::GET, "/", None, None).await;
    let (health_status, _) = send(ctx.app(), Method::GET, "/health", None, None).await;

    assert_eq!(banner_status, StatusCode::OK);
    assert_eq!(banner["endpoints"]["attendance"], "/api/attendance");
    assert_eq!(health_status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_task_status_or_priority_is_rejected() {
    // Arrange
    let ctx = setup().await.expect("Failed to setup test context");
    let admin = admin_token();
    let created = create(
        ctx.app(),
        "/api/tasks",
        json!({"eventId": "e-1", "volunteerId": "v-1", "title": "Stack chairs"}),
    )
    .await;
    let id = created["_id"].as_str().unwrap().to_string();

    // Act
    let (create_status, create_body) = send(
        ctx.app(),
        Method::POST,
        "/api/tasks",
        Some(&admin),
        Some(json!({"eventId": "e-1", "volunteerId": "v-1", "title": "Urgent", "priority": "urgent"})),
    )
    .await;
    let (update_status, update_body) = send(
        ctx.app(),
        Method::PUT,
        &format!("/api/tasks/{id}"),
        Some(&volunteer_token("v-1")),
        Some(json!({"status": "blocked"})),
    )
    .await;
    let (_, tasks) = send(ctx.app(), Method::GET, "/api/tasks", Some(&admin), None).await;

    // Assert
    assert_eq!(create_status, StatusCode::BAD_REQUEST);
    assert_eq!(create_body, json!({"error": "priority is invalid"}));
    assert_eq!(update_status, StatusCode::BAD_REQUEST);
    assert_eq!(update_body, json!({"error": "status is invalid"}));
    assert_eq!(tasks.as_array().map(Vec::len), Some(1));
    assert_eq!(tasks[0]["status"], "pending");
}

#[tokio::test]
async fn volunteer_cannot_reassign_a_task() {
    let ctx = setup().await.expect("Failed to setup test context");
    let created = create(
        ctx.app(),
        "/api/tasks",
        json!({"eventId": "e-1", "volunteerId": "v-1", "title": "Greet guests"}),
    )
    .await;
    let uri = format!("/api/tasks/{}", created["_id"].as_str().unwrap());

    let (volunteer_status, volunteer_body) = send(
        ctx.app(),
        Method::PATCH,
        &uri,
        Some(&volunteer_token("v-1")),
        Some(json!({"volunteerId": "v-2", "status": "completed"})),
    )
    .await;
    let (admin_status, reassigned) = send(
        ctx.app(),
        Method::PATCH,
        &uri,
        Some(&admin_token()),
        Some(json!({"volunteerId": "v-2"})),
    )
    .await;

    assert_eq!(volunteer_status, StatusCode::FORBIDDEN);
    assert_eq!(
        volunteer_body,
        json!({"error": "Only the task status can be changed"})
    );
    assert_eq!(admin_status, StatusCode::OK);
    assert_eq!(reassigned["volunteerId"], "v-2");
    assert_eq!(reassigned["status"], "pending");
}

#[tokio::test]
async fn unknown_event_status_is_rejected() {
    let ctx = setup().await.expect("Failed to setup test context");

    let (status, body) = send(
        ctx.app(),
        Method::POST,
        "/api/events",
        Some(&admin_token()),
        Some(json!({"name": "Fair", "date": "2025-11-02", "location": "Pune", "status": "cancelled"})),
    )
    .await;
    let (_, events) = send(ctx.app(), Method::GET, "/api/events", Some(&admin_token()), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "status is invalid"}));
    assert_eq!(events, json!([]));
}

#[tokio::test]
async fn volunteer_update_rejects_negative_hours_and_unknown_status() {
    let ctx = setup().await.expect("Failed to setup test context");
    let admin = admin_token();
    let created = create(
        ctx.app(),
        "/api/volunteers",
        json!({"name": "Asha", "email": "asha@portal.test", "phone": "98200"}),
    )
    .await;
    let uri = format!("/api/volunteers/{}", created["_id"].as_str().unwrap());

    let (hours_status, hours_body) = send(
        ctx.app(),
        Method::PUT,
        &uri,
        Some(&admin),
        Some(json!({"hours": -4})),
    )
    .await;
    let (status_status, status_body) = send(
        ctx.app(),
        Method::PUT,
        &uri,
        Some(&admin),
        Some(json!({"status": "retired"})),
    )
    .await;
    let (_, volunteers) = send(ctx.app(), Method::GET, "/api/volunteers", Some(&admin), None).await;

    assert_eq!(hours_status, StatusCode::BAD_REQUEST);
    assert_eq!(hours_body, json!({"error": "hours is invalid"}));
    assert_eq!(status_status, StatusCode::BAD_REQUEST);
    assert_eq!(status_body, json!({"error": "status is invalid"}));
    assert_eq!(volunteers[0]["hours"], 0.0);
    assert_eq!(volunteers[0]["status"], "active");
}
