//! Payment and withdrawal handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::{
    CreateWithdrawalRequest, PaymentResponse, SettlePurchaseRequest, SettlePurchaseResponse,
    WithdrawalRecord, WithdrawalResponse,
};
use crate::error::ApiResult;
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

const HISTORY_LIMIT: i64 = 200;

/// Provider-facing settlement callback; idempotent per provider_ref
pub async fn settle_purchase(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SettlePurchaseRequest>,
) -> ApiResult<Json<SettlePurchaseResponse>> {
    request.validate()?;

    let outcome = state
        .engine
        .settle_purchase(
            request.user_id,
            &request.provider_ref,
            request.points,
            request.amount,
            &request.currency,
        )
        .await?;

    Ok(Json(outcome.into()))
}

/// Caller's payment history, newest first
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<Vec<PaymentResponse>>> {
    let payments = state.db.payment_repo().list_by_user(user.user_id, HISTORY_LIMIT).await?;
    Ok(Json(payments.into_iter().map(PaymentResponse::from).collect()))
}

/// Request a withdrawal; points leave the balance immediately
pub async fn create_withdrawal(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(request): Json<CreateWithdrawalRequest>,
) -> ApiResult<(StatusCode, Json<WithdrawalResponse>)> {
    request.validate()?;

    let outcome = state
        .engine
        .request_withdrawal(user.user_id, request.points, &request.destination)
        .await?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// Caller's withdrawals, newest first
pub async fn list_withdrawals(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<Vec<WithdrawalRecord>>> {
    let withdrawals =
        state.db.withdrawal_repo().list_by_user(user.user_id, HISTORY_LIMIT).await?;
    Ok(Json(withdrawals.into_iter().map(WithdrawalRecord::from).collect()))
}

/// Cancel a pending withdrawal; the points come back
pub async fn cancel_withdrawal(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(withdrawal_id): Path<Uuid>,
) -> ApiResult<Json<WithdrawalResponse>> {
    let outcome = state.engine.cancel_withdrawal(withdrawal_id, user.user_id).await?;
    Ok(Json(outcome.into()))
}

/// Provider-facing payout confirmation
pub async fn complete_withdrawal(
    State(state): State<Arc<AppState>>,
    Path(withdrawal_id): Path<Uuid>,
) -> ApiResult<Json<WithdrawalRecord>> {
    let withdrawal = state.engine.complete_withdrawal(withdrawal_id).await?;
    Ok(Json(withdrawal.into()))
}
