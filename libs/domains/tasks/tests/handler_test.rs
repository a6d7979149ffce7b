//! Handler tests for the Tasks domain
//!
//! Drive the tasks router with `oneshot` against a migrated database and
//! check status codes, error codes and the response JSON.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_accounts::PgAccountRepository;
use domain_tasks::*;
use domain_tasks::presenter::DeleteTaskResponse;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::{TestDataBuilder, TestDatabase};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app(db: &TestDatabase) -> axum::Router {
    handlers::router(TaskService::new(
        PgTaskRepository::new(db.connection()),
        PgAccountRepository::new(db.connection()),
    ))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn create_body(owner_id: Uuid, title: &str) -> Value {
    json!({
        "ownerId": owner_id,
        "title": title,
        "date": "2024-01-09",
        "taskItems": [
            {
                "priority": "High",
                "density": "High",
                "durationTime": 60,
                "content": "Write chapter",
                "isRequired": true,
                "order": 0
            },
            {
                "priority": "Low",
                "density": "Low",
                "durationTime": 30,
                "content": "Reply to mail",
                "order": 1,
                "status": "Completed"
            }
        ]
    })
}

async fn create_task(db: &TestDatabase, owner_id: Uuid, title: &str) -> TaskResponse {
    let response = app(db)
        .oneshot(json_request("POST", "/tasks", create_body(owner_id, title)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_task_returns_created_with_stats() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("handler_create_task");
    let owner_id = db.create_test_account(&builder.email("owner")).await;

    let task = create_task(&db, owner_id, "Writing day").await;

    assert_eq!(task.owner_id, owner_id);
    assert_eq!(task.owner.first_name, "Test");
    assert_eq!(task.date, "2024-01-09");
    assert_eq!(task.task_items.len(), 2);
    assert_eq!(task.task_items[0].content, "Write chapter");
    assert_eq!(task.task_items[1].status, TaskItemStatus::NotStarted);
    assert_eq!(task.planned_task_count, 2);
    assert_eq!(task.planned_task_duration_minutes, 90);
    assert_eq!(task.completed_task_count, 0);
    assert_eq!(task.completion_rate, 0.0);
    assert_eq!(task.high_task_duration, 60);
    assert!(task.created_at.ends_with('Z'));
}

#[tokio::test]
async fn test_create_task_validation_errors() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("handler_create_validation");
    let owner_id = db.create_test_account(&builder.email("owner")).await;

    // No items
    let mut body = create_body(owner_id, "Empty");
    body["taskItems"] = json!([]);
    let response = app(&db)
        .oneshot(json_request("POST", "/tasks", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["error"], "VALIDATION_ERROR");

    // Malformed date
    let mut body = create_body(owner_id, "Bad date");
    body["date"] = json!("09/01/2024");
    let response = app(&db)
        .oneshot(json_request("POST", "/tasks", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Date without zero padding
    let mut body = create_body(owner_id, "Unpadded date");
    body["date"] = json!("2024-3-5");
    let response = app(&db)
        .oneshot(json_request("POST", "/tasks", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["error"], "VALIDATION_ERROR");

    // Duration outside the allowed set
    let mut body = create_body(owner_id, "Bad duration");
    body["taskItems"][0]["durationTime"] = json!(20);
    let response = app(&db)
        .oneshot(json_request("POST", "/tasks", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown owner
    let response = app(&db)
        .oneshot(json_request(
            "POST",
            "/tasks",
            create_body(Uuid::now_v7(), "Orphan"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_task_found_missing_and_malformed() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("handler_get_task");
    let owner_id = db.create_test_account(&builder.email("owner")).await;
    let created = create_task(&db, owner_id, "Lookup").await;

    let response = app(&db)
        .oneshot(get_request(&format!("/tasks/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let task: TaskResponse = json_body(response.into_body()).await;
    assert_eq!(task.id, created.id);
    assert_eq!(task.title, "Lookup");

    let response = app(&db)
        .oneshot(get_request(&format!("/tasks/{}", Uuid::now_v7())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["error"], "NOT_FOUND");

    let response = app(&db)
        .oneshot(get_request("/tasks/not-a-uuid"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_tasks_with_query() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("handler_list_tasks");
    let owner_id = db.create_test_account(&builder.email("owner")).await;
    let other_id = db.create_test_account(&builder.email("other")).await;
    create_task(&db, owner_id, "Mine").await;
    create_task(&db, other_id, "Theirs").await;

    let response = app(&db).oneshot(get_request("/tasks")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let all: Vec<TaskResponse> = json_body(response.into_body()).await;
    assert_eq!(all.len(), 2);

    let response = app(&db)
        .oneshot(get_request(&format!(
            "/tasks?ownerId={}&year-month=2024-01&q=chapter&sort=oldest",
            owner_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let mine: Vec<TaskResponse> = json_body(response.into_body()).await;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].title, "Mine");

    let response = app(&db)
        .oneshot(get_request("/tasks?year-month=2024-02"))
        .await
        .unwrap();
    let none: Vec<TaskResponse> = json_body(response.into_body()).await;
    assert!(none.is_empty());

    for bad in ["/tasks?year-month=2024-13", "/tasks?sort=random", "/tasks?ownerId=nope"] {
        let response = app(&db).oneshot(get_request(bad)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", bad);
    }
}

#[tokio::test]
async fn test_update_task_replaces_items() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("handler_update_task");
    let owner_id = db.create_test_account(&builder.email("owner")).await;
    let created = create_task(&db, owner_id, "Before").await;
    let kept = &created.task_items[0];
    let new_id = Uuid::now_v7();

    let body = json!({
        "ownerId": owner_id,
        "title": "After",
        "date": "2024-01-10",
        "taskItems": [
            {
                "id": kept.id,
                "priority": "High",
                "density": "High",
                "durationTime": 60,
                "content": "Write chapter",
                "isRequired": true,
                "order": 0,
                "status": "Completed"
            },
            {
                "id": new_id,
                "priority": "Medium",
                "density": "Medium",
                "durationTime": 15,
                "content": "Stretch",
                "order": 1,
                "status": "NotStarted"
            }
        ]
    });

    let response = app(&db)
        .oneshot(json_request("PUT", &format!("/tasks/{}", created.id), body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let task: TaskResponse = json_body(response.into_body()).await;
    assert_eq!(task.title, "After");
    assert_eq!(task.date, "2024-01-10");
    assert_eq!(task.task_items.len(), 2);
    assert_eq!(task.task_items[0].id, kept.id);
    assert_eq!(task.task_items[1].id, new_id);
    assert_eq!(task.completed_task_count, 1);
    assert_eq!(task.completed_task_duration_minutes, 60);
    assert_eq!(task.completion_rate, 50.0);

    // Someone else may not update it
    let other_id = db.create_test_account(&builder.email("other")).await;
    let mut foreign = body;
    foreign["ownerId"] = json!(other_id);
    let response = app(&db)
        .oneshot(json_request("PUT", &format!("/tasks/{}", created.id), foreign))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_update_review_sets_and_clears() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("handler_update_review");
    let owner_id = db.create_test_account(&builder.email("owner")).await;
    let created = create_task(&db, owner_id, "Reviewed").await;
    let uri = format!("/tasks/{}/review", created.id);

    let response = app(&db)
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({ "ownerId": owner_id, "review": "Solid day" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let task: TaskResponse = json_body(response.into_body()).await;
    assert_eq!(task.review.as_deref(), Some("Solid day"));

    let response = app(&db)
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({ "ownerId": owner_id, "review": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert!(body.get("review").is_none());

    let response = app(&db)
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({ "ownerId": Uuid::now_v7(), "review": "Not mine" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_item_output_completes_item() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("handler_item_output");
    let owner_id = db.create_test_account(&builder.email("owner")).await;
    let created = create_task(&db, owner_id, "Outputs").await;
    let item_id = created.task_items[1].id;

    let response = app(&db)
        .oneshot(json_request(
            "PUT",
            &format!("/taskitems/{}", item_id),
            json!({ "ownerId": owner_id, "output": "Inbox zero" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let task: TaskResponse = json_body(response.into_body()).await;
    let item = task.task_items.iter().find(|i| i.id == item_id).unwrap();
    assert_eq!(item.status, TaskItemStatus::Completed);
    assert_eq!(item.output.as_deref(), Some("Inbox zero"));
    assert_eq!(task.completed_task_duration_minutes, 30);

    let response = app(&db)
        .oneshot(json_request(
            "PUT",
            &format!("/taskitems/{}", item_id),
            json!({ "ownerId": owner_id, "output": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app(&db)
        .oneshot(json_request(
            "PUT",
            &format!("/taskitems/{}", Uuid::now_v7()),
            json!({ "ownerId": owner_id, "output": "Ghost" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_task_requires_owner() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("handler_delete_task");
    let owner_id = db.create_test_account(&builder.email("owner")).await;
    let other_id = db.create_test_account(&builder.email("other")).await;
    let created = create_task(&db, owner_id, "Doomed").await;
    let uri = format!("/tasks/{}", created.id);

    let response = app(&db)
        .oneshot(json_request("DELETE", &uri, json!({ "ownerId": other_id })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app(&db)
        .oneshot(json_request("DELETE", &uri, json!({ "ownerId": owner_id })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: DeleteTaskResponse = json_body(response.into_body()).await;
    assert!(body.success);

    let response = app(&db).oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
