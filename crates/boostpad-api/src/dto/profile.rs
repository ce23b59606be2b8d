//! Profile DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use boostpad_db::{DbProfile, DbTaskCompletion};

/// Own profile snapshot
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub balance: Decimal,
    pub plan: String,
    pub available_tasks: i32,
    pub daily_task_limit: i32,
    pub chosen_country: Option<String>,
    pub completed_tasks_count: i32,
    pub bonus_tasks_completed: i32,
    pub created_at: DateTime<Utc>,
}

impl From<DbProfile> for ProfileResponse {
    fn from(profile: DbProfile) -> Self {
        let plan = profile.tier().to_string();
        Self {
            id: profile.id,
            balance: profile.balance,
            plan,
            available_tasks: profile.available_tasks,
            daily_task_limit: profile.daily_task_limit,
            chosen_country: profile.chosen_country,
            completed_tasks_count: profile.completed_tasks_count,
            bonus_tasks_completed: profile.bonus_tasks_completed,
            created_at: profile.created_at,
        }
    }
}

/// Profile update request; absent fields are left untouched
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// ISO country code driving bonus eligibility; empty string clears it
    #[serde(default)]
    #[validate(length(max = 2))]
    pub chosen_country: Option<String>,
    /// Plan tier name; normally set by the billing callback
    #[serde(default)]
    pub plan: Option<String>,
}

/// One completed action in the caller's history
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRecord {
    pub id: Uuid,
    pub task_id: Uuid,
    pub action: String,
    pub post_url: String,
    pub completed_at: DateTime<Utc>,
}

impl From<DbTaskCompletion> for CompletionRecord {
    fn from(completion: DbTaskCompletion) -> Self {
        Self {
            id: completion.id,
            task_id: completion.task_id,
            action: completion.action,
            post_url: completion.post_url,
            completed_at: completion.completed_at,
        }
    }
}
