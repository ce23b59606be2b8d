//! Task handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use boostpad_types::{ActionType, ReportReason};

use crate::dto::{
    CompleteTaskRequest, CompleteTaskResponse, CreateTaskRequest, CreateTaskResponse, FeedQuery,
    ReportResponse, ReportTaskRequest, ReportTaskResponse, TaskDetailResponse, TaskResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

const MY_TASKS_LIMIT: i64 = 200;

/// Create a task
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<CreateTaskResponse>)> {
    request.validate()?;

    let task_type: ActionType = request
        .task_type
        .parse()
        .map_err(|_| ApiError::InvalidParameter(format!("unknown action: {}", request.task_type)))?;

    let created = state
        .engine
        .create_task(boostpad_engine::CreateTaskRequest {
            creator: user.user_id,
            social_network: request.social_network,
            task_type,
            post_url: request.post_url,
            price: request.price,
            actions_required: request.actions_required,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Ordered feed of tasks the caller can work on
pub async fn task_feed(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let mut feed = state.engine.task_feed(user.user_id, query.network.as_deref()).await?;

    if let Some(limit) = query.limit {
        feed.truncate(limit);
    }

    Ok(Json(feed.into_iter().map(TaskResponse::from).collect()))
}

/// Caller's own tasks, newest first
pub async fn my_tasks(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = state.db.task_repo().list_by_creator(user.user_id, MY_TASKS_LIMIT).await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Single task; owners additionally see the reports filed against it
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<TaskDetailResponse>> {
    let task = state
        .db
        .task_repo()
        .find_by_id(task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("task {task_id}")))?;

    let reports = if task.creator_id == user.user_id {
        let reports = state.db.report_repo().list_for_task(task_id).await?;
        Some(reports.into_iter().map(ReportResponse::from).collect())
    } else {
        None
    };

    Ok(Json(TaskDetailResponse { task: task.into(), reports }))
}

/// Record one completed action on a task
pub async fn complete_task(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(task_id): Path<Uuid>,
    Json(request): Json<CompleteTaskRequest>,
) -> ApiResult<Json<CompleteTaskResponse>> {
    request.validate()?;

    let outcome = state
        .engine
        .complete_task(task_id, user.user_id, &request.action, request.metadata)
        .await?;

    Ok(Json(outcome.into()))
}

/// Delete an own task; the undone remainder is refunded
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<crate::dto::DeleteTaskResponse>> {
    let outcome = state.engine.delete_task(task_id, user.user_id).await?;
    Ok(Json(outcome.into()))
}

/// Report a task
pub async fn report_task(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(task_id): Path<Uuid>,
    Json(request): Json<ReportTaskRequest>,
) -> ApiResult<(StatusCode, Json<ReportTaskResponse>)> {
    request.validate()?;

    let reason: ReportReason = request
        .reason
        .parse()
        .map_err(|_| ApiError::InvalidParameter(format!("unknown reason: {}", request.reason)))?;

    let outcome =
        state.engine.report_task(task_id, user.user_id, reason, request.details).await?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}
