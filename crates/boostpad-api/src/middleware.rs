//! API middleware

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

/// Resolve the bearer token and attach the authenticated user.
///
/// Also upserts the caller's profile row so every authenticated request
/// operates against an existing profile; first contact creates it with
/// free-tier defaults.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized.into_response())?;

    let user_id = state
        .identity
        .resolve(token)
        .await
        .map_err(|_| ApiError::Unauthorized.into_response())?;

    state
        .db
        .profile_repo()
        .ensure(user_id, None)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });
    Ok(next.run(req).await)
}
