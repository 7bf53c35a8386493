use axum::{
    Json,
    extract::State,
    http::StatusCode
};
use crate::handlers::shared_types::ErrorResponse;
use serde::Deserialize;
use crate::AppState;
use crate::domain::Task;

#[derive(Debug, Deserialize)]
pub struct CreateTask {
    title: Option<String>,
}

/// Handler for listing tasks (GET /tasks).
///
/// Responds with `200 OK` and a JSON array of all tasks, newest first.
#[tracing::instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<Task>>, StatusCode> {
    // ---
    let tasks = state.task_store().list().await.map_err(|err| {
        tracing::error!("failed to list tasks: {err:?}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(tasks))
}

/// Handler for creating a task (POST /tasks).
///
/// Expects a JSON body with a `title` field.
///
/// - If `title` is absent or empty, responds with `400 Bad Request` and
///   `{"error": "title is required"}`.
/// - On success, responds with `201 Created` and the full task object
///   (`done` starts out false).
#[tracing::instrument(skip(state, body))]
pub async fn create_task(
    State(state): State<AppState>,
    Json(body): Json<CreateTask>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, ErrorResponse)> {
    // ---
    let title = match body.title.as_deref() {
        Some(title) if !title.is_empty() => title,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("title is required"),
            ))
        }
    };

    let task = state.task_store().create(title).await.map_err(|err| {
        tracing::error!("failed to create task: {err:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("failed to create task"),
        )
    })?;

    state.metrics().record_task_created();

    Ok((StatusCode::CREATED, Json(task)))
}
