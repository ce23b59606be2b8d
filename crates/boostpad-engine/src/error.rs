//! Engine error types
//!
//! State-conflict errors are distinct variants so the API layer can map them
//! to client errors; unique-constraint races that slip past application-level
//! checks are translated into the same variants and never surface as raw
//! database errors.

use boostpad_db::DbError;
use boostpad_types::PricingError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors from the transactional core
#[derive(Debug, Error)]
pub enum EngineError {
    // Validation (caught before any transaction opens)
    #[error("Missing or invalid field: {0}")]
    MissingField(&'static str),

    #[error("Invalid task configuration: {0}")]
    InvalidTaskConfiguration(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(&'static str),

    #[error("Unknown social network: {0}")]
    UnknownNetwork(String),

    #[error("Action '{action}' is not available on {network}")]
    InvalidActionForNetwork { network: String, action: String },

    #[error("URL does not look like a {network} link")]
    InvalidUrlFormat { network: String },

    // State conflicts (precondition fails, possibly re-checked under lock)
    #[error("An active task already targets this content")]
    DuplicateActiveTask { existing_task_id: Uuid },

    #[error("Insufficient balance: need {required}, have {available}")]
    InsufficientBalance { required: Decimal, available: Decimal },

    #[error("Daily task quota exhausted")]
    TaskQuotaExhausted,

    #[error("Task is not active")]
    TaskNotActive(Uuid),

    #[error("Action type mismatch: task wants '{expected}', got '{got}'")]
    ActionTypeMismatch { expected: String, got: String },

    #[error("Action already completed on this task")]
    AlreadyCompleted,

    #[error("Task already reported by this user")]
    AlreadyReported,

    #[error("Task cannot be deleted in state '{0}'")]
    InvalidTaskState(String),

    #[error("Withdrawal cannot be cancelled in state '{0}'")]
    InvalidWithdrawalState(String),

    #[error("Caller does not own this task")]
    NotTaskOwner,

    // Not found
    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("Profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("Withdrawal not found: {0}")]
    WithdrawalNotFound(Uuid),

    // Upstream
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl EngineError {
    /// Fold a sqlx error into a domain error when it names one of our
    /// uniqueness constraints; everything else stays a database error.
    pub(crate) fn from_sqlx(e: sqlx::Error) -> Self {
        let db_err = DbError::Query(e);
        match db_err.constraint_name() {
            Some("task_completions_task_user_action_key") => EngineError::AlreadyCompleted,
            Some("task_reports_task_user_key") => EngineError::AlreadyReported,
            _ => EngineError::Db(db_err),
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
