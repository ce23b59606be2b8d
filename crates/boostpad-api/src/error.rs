//! API error handling
//!
//! Maps engine and database errors onto a stable HTTP error surface.
//! Internal failures are logged and returned as an opaque 500; the client
//! never sees constraint names or SQL details.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use boostpad_db::DbError;
use boostpad_engine::EngineError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error with HTTP status mapping
#[derive(Debug, Error)]
pub enum ApiError {
    // Authentication
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    // Request validation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid request body")]
    InvalidRequestBody,

    // Task state conflicts
    #[error("An active task already targets this content")]
    DuplicateActiveTask { existing_task_id: uuid::Uuid },

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Daily task quota exhausted")]
    TaskQuotaExhausted,

    #[error("Task is not active")]
    TaskNotActive,

    #[error("Action type does not match the task")]
    ActionTypeMismatch,

    #[error("Action already completed on this task")]
    AlreadyCompleted,

    #[error("Task already reported")]
    AlreadyReported,

    #[error("Invalid task state: {0}")]
    InvalidTaskState(String),

    #[error("Invalid withdrawal state: {0}")]
    InvalidWithdrawalState(String),

    // Resources
    #[error("Resource not found: {0}")]
    NotFound(String),

    // Internal
    #[error("Internal server error")]
    InternalError,

    #[error("Database error")]
    DatabaseError,
}

impl ApiError {
    /// Stable machine-readable code for the response body
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidParameter(_) => "INVALID_PARAMETER",
            Self::MissingParameter(_) => "MISSING_PARAMETER",
            Self::InvalidRequestBody => "INVALID_REQUEST_BODY",
            Self::DuplicateActiveTask { .. } => "DUPLICATE_ACTIVE_TASK",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::TaskQuotaExhausted => "TASK_QUOTA_EXHAUSTED",
            Self::TaskNotActive => "TASK_NOT_ACTIVE",
            Self::ActionTypeMismatch => "ACTION_TYPE_MISMATCH",
            Self::AlreadyCompleted => "ALREADY_COMPLETED",
            Self::AlreadyReported => "ALREADY_REPORTED",
            Self::InvalidTaskState(_) => "INVALID_TASK_STATE",
            Self::InvalidWithdrawalState(_) => "INVALID_WITHDRAWAL_STATE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            Self::InvalidParameter(_)
            | Self::MissingParameter(_)
            | Self::InvalidRequestBody => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            Self::Unauthorized => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::Forbidden => StatusCode::FORBIDDEN,

            // 404 Not Found
            Self::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::DuplicateActiveTask { .. }
            | Self::AlreadyCompleted
            | Self::AlreadyReported => StatusCode::CONFLICT,

            // 422 Unprocessable Entity
            Self::InsufficientBalance
            | Self::TaskQuotaExhausted
            | Self::TaskNotActive
            | Self::ActionTypeMismatch
            | Self::InvalidTaskState(_)
            | Self::InvalidWithdrawalState(_) => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub msg: String,
    /// Id of the task already occupying a duplicate key, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_task_id: Option<uuid::Uuid>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let existing_task_id = match err {
            ApiError::DuplicateActiveTask { existing_task_id } => Some(*existing_task_id),
            _ => None,
        };
        Self { code: err.error_code().to_string(), msg: err.to_string(), existing_task_id }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::from(&self);
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::MissingField(field) => Self::MissingParameter(field.to_string()),
            EngineError::InvalidTaskConfiguration(msg) => Self::InvalidParameter(msg),
            EngineError::InvalidAmount(msg) => Self::InvalidParameter(msg.to_string()),
            EngineError::UnknownNetwork(code) => {
                Self::InvalidParameter(format!("unknown social network: {code}"))
            }
            EngineError::InvalidActionForNetwork { network, action } => {
                Self::InvalidParameter(format!("action '{action}' is not available on {network}"))
            }
            EngineError::InvalidUrlFormat { network } => {
                Self::InvalidParameter(format!("URL does not look like a {network} link"))
            }
            EngineError::Pricing(e) => Self::InvalidParameter(e.to_string()),

            EngineError::DuplicateActiveTask { existing_task_id } => {
                Self::DuplicateActiveTask { existing_task_id }
            }
            EngineError::InsufficientBalance { .. } => Self::InsufficientBalance,
            EngineError::TaskQuotaExhausted => Self::TaskQuotaExhausted,
            EngineError::TaskNotActive(_) => Self::TaskNotActive,
            EngineError::ActionTypeMismatch { .. } => Self::ActionTypeMismatch,
            EngineError::AlreadyCompleted => Self::AlreadyCompleted,
            EngineError::AlreadyReported => Self::AlreadyReported,
            EngineError::InvalidTaskState(state) => Self::InvalidTaskState(state),
            EngineError::InvalidWithdrawalState(state) => Self::InvalidWithdrawalState(state),
            EngineError::NotTaskOwner => Self::Forbidden,

            EngineError::TaskNotFound(id) => Self::NotFound(format!("task {id}")),
            EngineError::ProfileNotFound(id) => Self::NotFound(format!("profile {id}")),
            EngineError::WithdrawalNotFound(id) => Self::NotFound(format!("withdrawal {id}")),

            EngineError::Db(e) => Self::from(e),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        tracing::error!(error = ?err, "Database error");
        match err {
            DbError::NotFound(msg) => Self::NotFound(msg),
            _ => Self::DatabaseError,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(_: serde_json::Error) -> Self {
        Self::InvalidRequestBody
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.as_ref().map(|m| m.as_ref()).unwrap_or("invalid")
                    )
                })
            })
            .collect();
        Self::InvalidParameter(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn state_conflicts_map_to_conflict_or_unprocessable() {
        let dup = ApiError::from(EngineError::DuplicateActiveTask {
            existing_task_id: Uuid::new_v4(),
        });
        assert_eq!(dup.status_code(), StatusCode::CONFLICT);

        let broke = ApiError::from(EngineError::InsufficientBalance {
            required: dec!(50),
            available: dec!(10),
        });
        assert_eq!(broke.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(
            ApiError::from(EngineError::AlreadyCompleted).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::from(EngineError::MissingField("post_url"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "MISSING_PARAMETER");

        let err = ApiError::from(EngineError::UnknownNetwork("myspace".to_string()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_and_ownership() {
        let id = Uuid::new_v4();
        assert_eq!(
            ApiError::from(EngineError::TaskNotFound(id)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(EngineError::NotTaskOwner).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn internal_errors_stay_opaque() {
        let err = ApiError::from(DbError::Connection("postgres down".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("postgres"));
    }

    #[test]
    fn duplicate_response_carries_existing_id() {
        let id = Uuid::new_v4();
        let body = ErrorResponse::from(&ApiError::DuplicateActiveTask { existing_task_id: id });
        assert_eq!(body.existing_task_id, Some(id));
        assert_eq!(body.code, "DUPLICATE_ACTIVE_TASK");
    }
}
