use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    state::AppState,
    store::{NewTask, Task, TaskUpdate},
};

use super::dto::{CreateTaskRequest, UpdateTaskRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("cannot parse JSON"))?;

    // The allotted user must exist at creation time.
    if state
        .users
        .find_by_username(&payload.allotted_to)
        .await?
        .is_none()
    {
        warn!(allotted_to = %payload.allotted_to, "allotted user does not exist");
        return Err(ApiError::bad_request("allotted user does not exist"));
    }

    let task = state
        .tasks
        .insert(NewTask {
            owner_id,
            title: payload.title,
            description: payload.description,
            allotted_to: payload.allotted_to,
            done_by: payload.done_by,
            status: "Pending".to_string(),
            start_time: OffsetDateTime::now_utc(),
            end_time: payload.end_time,
        })
        .await?;

    info!(task_id = %task.id, owner_id = %owner_id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.tasks.list_by_owner(owner_id).await?;
    Ok(Json(tasks))
}

#[instrument(skip(state))]
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    // A malformed identifier can never match an owned task.
    let task_id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found("task not found"))?;
    let task = state
        .tasks
        .find(owner_id, task_id)
        .await?
        .ok_or_else(|| ApiError::not_found("task not found"))?;
    Ok(Json(task))
}

#[instrument(skip(state, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let task_id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("invalid task ID"))?;
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("cannot parse JSON"))?;

    let task = state
        .tasks
        .update(
            owner_id,
            task_id,
            TaskUpdate {
                title: payload.title,
                description: payload.description,
                allotted_to: payload.allotted_to,
                done_by: payload.done_by,
                status: payload.status,
                end_time: payload.end_time,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("task not found"))?;

    info!(task_id = %task.id, owner_id = %owner_id, "task updated");
    Ok(Json(task))
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let task_id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("invalid task ID"))?;

    if !state.tasks.delete(owner_id, task_id).await? {
        return Err(ApiError::not_found("task not found"));
    }

    info!(task_id = %task_id, owner_id = %owner_id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}
