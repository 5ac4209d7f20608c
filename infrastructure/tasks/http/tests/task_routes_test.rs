use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use task_http::{TaskServices, routes};
use test_utils::*;
use tower::ServiceExt;
use uuid::Uuid;

fn app(repos: &TestRepos) -> Router {
    routes(TaskServices::new(
        repos.project_repo(),
        repos.task_repo(),
        memory_cache(),
    ))
}

async fn send(
    app: &Router, method: &str, uri: &str, body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => request.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    }
    else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

#[tokio::test]
async fn test_task_lifecycle() -> anyhow::Result<()> {
    let repos = TestRepos::new();
    let app = app(&repos);
    let project = project_named("Garden");
    repos.projects.insert(project.clone());

    let (status, created) = send(
        &app,
        "POST",
        "/tasks",
        Some(json!({
            "project_id": project.id,
            "title": "Plant tomatoes",
            "priority": "high",
            "tags": [" spring ", "outdoor", "spring", ""],
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "todo");
    assert_eq!(created["tags"], json!(["spring", "outdoor"]));
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/tasks/{id}"),
        Some(json!({"status": "in_progress", "assignee": "sam"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "in_progress");

    let (status, fetched) = send(&app, "GET", &format!("/tasks/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["assignee"], "sam");

    let (status, _) = send(&app, "DELETE", &format!("/tasks/{id}"), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/tasks/{id}"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "TASK_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn test_create_for_unknown_project_is_404() -> anyhow::Result<()> {
    let repos = TestRepos::new();
    let app = app(&repos);

    let (status, body) = send(
        &app,
        "POST",
        "/tasks",
        Some(json!({"project_id": Uuid::now_v7(), "title": "Lost"})),
    )
    .await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "PROJECT_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn test_project_tasks_reflect_new_task() -> anyhow::Result<()> {
    let repos = TestRepos::new();
    let app = app(&repos);
    let project = project_named("Kitchen");
    repos.projects.insert(project.clone());
    repos.tasks.insert(task_for(project.id, "Buy tiles"));
    let uri = format!("/projects/{}/tasks", project.id);

    let (_, before) = send(&app, "GET", &uri, None).await?;
    assert_eq!(before["total"], 1);

    send(
        &app,
        "POST",
        "/tasks",
        Some(json!({"project_id": project.id, "title": "Lay tiles"})),
    )
    .await?;

    // relationship entry was invalidated by the create
    let (status, after) = send(&app, "GET", &uri, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["project_name"], "Kitchen");
    assert_eq!(after["total"], 2);
    assert_eq!(after["tasks"][1]["title"], "Lay tiles");
    Ok(())
}

#[tokio::test]
async fn test_bulk_delete_by_project() -> anyhow::Result<()> {
    let repos = TestRepos::new();
    let app = app(&repos);
    let project = project_named("Garage");
    repos.projects.insert(project.clone());
    for title in ["Sweep", "Sort tools"] {
        repos.tasks.insert(task_for(project.id, title));
    }
    let uri = format!("/projects/{}/tasks", project.id);

    let (status, body) = send(&app, "DELETE", &uri, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 2);

    let (_, listing) = send(
        &app,
        "GET",
        &format!("/tasks?project_id={}", project.id),
        None,
    )
    .await?;
    assert_eq!(listing["total"], 0);

    let (status, _) =
        send(&app, "DELETE", &format!("/projects/{}/tasks", Uuid::now_v7()), None)
            .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_list_filters() -> anyhow::Result<()> {
    let repos = TestRepos::new();
    let app = app(&repos);
    let project_id = Uuid::now_v7();
    let mut tagged = task_for(project_id, "Tagged");
    tagged.tags = vec!["urgent".into()];
    tagged.assignee = Some("kim".into());
    repos.tasks.insert(tagged);
    repos.tasks.insert(task_for(project_id, "Plain"));

    let (status, page) =
        send(&app, "GET", "/tasks?tag=urgent&assignee=kim", None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["title"], "Tagged");

    let (status, _) = send(&app, "GET", "/tasks?priority=extreme", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_blank_title_is_rejected() -> anyhow::Result<()> {
    let repos = TestRepos::new();
    let app = app(&repos);
    let project = project_named("Validation");
    repos.projects.insert(project.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/tasks",
        Some(json!({"project_id": project.id, "title": "  "})),
    )
    .await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "TASK_VALIDATION_FAILED");
    assert!(body["error"]["details"].is_string());
    Ok(())
}
