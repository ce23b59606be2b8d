//! API routes

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Create API v1 routes
pub fn api_v1_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(user_routes(state))
        .merge(provider_routes())
}

/// Routes behind bearer authentication
fn user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        // Tasks
        .route("/tasks", post(handlers::tasks::create_task))
        .route("/tasks/feed", get(handlers::tasks::task_feed))
        .route("/tasks/mine", get(handlers::tasks::my_tasks))
        .route("/tasks/:id", get(handlers::tasks::get_task))
        .route("/tasks/:id", delete(handlers::tasks::delete_task))
        .route("/tasks/:id/complete", post(handlers::tasks::complete_task))
        .route("/tasks/:id/report", post(handlers::tasks::report_task))
        // Profile
        .route("/profile", get(handlers::profile::get_profile))
        .route("/profile", patch(handlers::profile::update_profile))
        .route("/completions", get(handlers::profile::my_completions))
        // Ledger
        .route("/payments", get(handlers::ledger::list_payments))
        .route("/withdrawals", post(handlers::ledger::create_withdrawal))
        .route("/withdrawals", get(handlers::ledger::list_withdrawals))
        .route("/withdrawals/:id/cancel", post(handlers::ledger::cancel_withdrawal))
        .layer(from_fn_with_state(state, auth_middleware))
}

/// Provider-facing callbacks; reach the service over the internal network,
/// not through the user gateway.
fn provider_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/payments/settle", post(handlers::ledger::settle_purchase))
        .route("/withdrawals/:id/complete", post(handlers::ledger::complete_withdrawal))
}
