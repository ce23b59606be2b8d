//! Profile handlers

use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use boostpad_types::PlanTier;

use crate::dto::{CompletionRecord, ProfileResponse, UpdateProfileRequest};
use crate::error::{ApiError, ApiResult};
use crate::extractors::AuthenticatedUser;
use crate::state::AppState;

const COMPLETIONS_LIMIT: i64 = 200;

/// Own profile and balance snapshot
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state
        .db
        .profile_repo()
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("profile {}", user.user_id)))?;

    Ok(Json(profile.into()))
}

/// Update profile settings; absent fields are left untouched
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    request.validate()?;

    let repo = state.db.profile_repo();

    if let Some(country) = &request.chosen_country {
        let country = country.trim().to_ascii_uppercase();
        let value = if country.is_empty() { None } else { Some(country.as_str()) };
        repo.set_chosen_country(user.user_id, value).await?;
    }

    if let Some(plan) = &request.plan {
        let tier: PlanTier = plan
            .parse()
            .map_err(|_| ApiError::InvalidParameter(format!("unknown plan: {plan}")))?;
        repo.set_plan(user.user_id, tier).await?;
    }

    let profile = repo
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("profile {}", user.user_id)))?;

    Ok(Json(profile.into()))
}

/// Caller's completion history, newest first
pub async fn my_completions(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<Vec<CompletionRecord>>> {
    let completions =
        state.db.completion_repo().list_by_user(user.user_id, COMPLETIONS_LIMIT).await?;
    Ok(Json(completions.into_iter().map(CompletionRecord::from).collect()))
}
