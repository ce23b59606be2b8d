//! Task DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use boostpad_db::{DbFeedCandidate, DbTask, DbTaskReport};
use boostpad_engine::{CompletionOutcome, CreatedTask, DeletionOutcome, ReportOutcome};

/// Create task request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Social network code (e.g. "instagram", "youtube")
    #[validate(length(min = 1))]
    pub social_network: String,
    /// Action type (e.g. "like", "follow")
    #[validate(length(min = 1))]
    pub task_type: String,
    /// Link to the content being promoted
    #[validate(length(min = 1, max = 2048))]
    pub post_url: String,
    /// Points per action, before tier discount
    pub price: Decimal,
    /// Main action target
    #[validate(range(min = 1))]
    pub actions_required: i32,
}

/// Task representation shared by all task-returning endpoints
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub social_network: String,
    pub task_type: String,
    pub post_url: String,
    pub original_price: Decimal,
    pub actions_required: i32,
    pub actions_completed: i32,
    pub bonus_actions: i32,
    pub bonus_actions_completed: i32,
    pub status: String,
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<DbTask> for TaskResponse {
    fn from(task: DbTask) -> Self {
        Self {
            id: task.id,
            creator_id: task.creator_id,
            social_network: task.social_network,
            task_type: task.task_type,
            post_url: task.post_url,
            original_price: task.original_price,
            actions_required: task.actions_required,
            actions_completed: task.actions_completed,
            bonus_actions: task.bonus_actions,
            bonus_actions_completed: task.bonus_actions_completed,
            status: task.status,
            is_pinned: task.is_pinned,
            created_at: task.created_at,
            completed_at: task.completed_at,
        }
    }
}

impl From<DbFeedCandidate> for TaskResponse {
    fn from(candidate: DbFeedCandidate) -> Self {
        candidate.task.into()
    }
}

/// Create task response
#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskResponse {
    pub task: TaskResponse,
    pub discounted_cost: Decimal,
    pub new_balance: Decimal,
}

impl From<CreatedTask> for CreateTaskResponse {
    fn from(created: CreatedTask) -> Self {
        Self {
            discounted_cost: created.discounted_cost,
            new_balance: created.new_balance,
            task: created.task.into(),
        }
    }
}

/// Feed query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct FeedQuery {
    /// Restrict the feed to one social network
    #[serde(default)]
    pub network: Option<String>,
    /// Cap the page below the configured page size
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Task detail; reports are present only when the caller owns the task
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetailResponse {
    pub task: TaskResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<ReportResponse>>,
}

/// Complete action request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompleteTaskRequest {
    /// Action type performed; must match the task
    #[validate(length(min = 1))]
    pub action: String,
    /// Optional client evidence, stored as-is
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Complete action response
#[derive(Debug, Clone, Serialize)]
pub struct CompleteTaskResponse {
    pub reward: Decimal,
    pub new_balance: Decimal,
    pub task_status: String,
}

impl From<CompletionOutcome> for CompleteTaskResponse {
    fn from(outcome: CompletionOutcome) -> Self {
        Self {
            reward: outcome.reward,
            new_balance: outcome.new_balance,
            task_status: outcome.task_status.to_string(),
        }
    }
}

/// Delete task response
#[derive(Debug, Clone, Serialize)]
pub struct DeleteTaskResponse {
    pub refunded_points: Decimal,
    pub new_balance: Decimal,
    pub new_available_tasks: i32,
}

impl From<DeletionOutcome> for DeleteTaskResponse {
    fn from(outcome: DeletionOutcome) -> Self {
        Self {
            refunded_points: outcome.refunded_points,
            new_balance: outcome.new_balance,
            new_available_tasks: outcome.new_available_tasks,
        }
    }
}

/// Report task request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReportTaskRequest {
    /// Report reason code ("not_available", "not_working", ...)
    #[validate(length(min = 1))]
    pub reason: String,
    /// Free-text details
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub details: Option<String>,
}

/// Report record
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub id: Uuid,
    pub reason: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbTaskReport> for ReportResponse {
    fn from(report: DbTaskReport) -> Self {
        Self {
            id: report.id,
            reason: report.reason,
            details: report.details,
            created_at: report.created_at,
        }
    }
}

/// Report submission response
#[derive(Debug, Clone, Serialize)]
pub struct ReportTaskResponse {
    pub report_id: Uuid,
    pub task_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refunded_points: Option<Decimal>,
}

impl From<ReportOutcome> for ReportTaskResponse {
    fn from(outcome: ReportOutcome) -> Self {
        Self {
            report_id: outcome.report_id,
            task_status: outcome.task_status.to_string(),
            refunded_points: outcome.refunded_points,
        }
    }
}
