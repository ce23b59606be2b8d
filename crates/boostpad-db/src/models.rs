//! Database models - mapped from PostgreSQL tables

use boostpad_types::{PlanTier, TaskStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Column list matching [`DbProfile`]'s field order
pub const PROFILE_COLUMNS: &str = "id, balance, status, available_tasks, daily_task_limit, \
     chosen_country, country_code, completed_tasks_count, bonus_tasks_completed, \
     game_rewards_claimed, last_reward_at_task_count, invited_by, created_at, updated_at";

/// Column list matching [`DbTask`]'s field order
pub const TASK_COLUMNS: &str = "id, creator_id, social_network, task_type, post_url, url_key, \
     price, original_price, actions_required, actions_completed, bonus_actions, \
     bonus_actions_completed, status, is_pinned, deletion_reason, created_at, \
     completed_at, completion_duration_secs";

// ============================================================================
// Profile Models
// ============================================================================

/// One row per user; created at first authentication, never hard-deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbProfile {
    pub id: Uuid,
    pub balance: Decimal,
    pub status: String,
    pub available_tasks: i32,
    pub daily_task_limit: i32,
    pub chosen_country: Option<String>,
    pub country_code: Option<String>,
    pub completed_tasks_count: i32,
    pub bonus_tasks_completed: i32,
    pub game_rewards_claimed: i32,
    pub last_reward_at_task_count: i32,
    pub invited_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbProfile {
    /// Plan tier parsed from the stored status; unknown values fall back to
    /// the free tier rather than failing a read path.
    pub fn tier(&self) -> PlanTier {
        self.status.parse().unwrap_or_default()
    }
}

// ============================================================================
// Task Models
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbTask {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub social_network: String,
    pub task_type: String,
    pub post_url: String,
    pub url_key: String,
    pub price: Decimal,
    pub original_price: Decimal,
    pub actions_required: i32,
    pub actions_completed: i32,
    pub bonus_actions: i32,
    pub bonus_actions_completed: i32,
    pub status: String,
    pub is_pinned: bool,
    pub deletion_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completion_duration_secs: Option<i64>,
}

impl DbTask {
    pub fn task_status(&self) -> TaskStatus {
        self.status.parse().unwrap_or(TaskStatus::Deleted)
    }

    /// Main action slots still open
    pub fn main_remaining(&self) -> i32 {
        self.actions_required - self.actions_completed
    }

    /// Bonus action slots still open
    pub fn bonus_remaining(&self) -> i32 {
        self.bonus_actions - self.bonus_actions_completed
    }
}

/// Feed candidate row: a task joined with its creator's plan status, which
/// drives tier-priority ranking in the feed selector.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbFeedCandidate {
    #[sqlx(flatten)]
    pub task: DbTask,
    pub creator_status: String,
}

impl DbFeedCandidate {
    pub fn creator_tier(&self) -> PlanTier {
        self.creator_status.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbTaskCompletion {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub post_url: String,
    pub metadata: Option<serde_json::Value>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbTaskReport {
    pub id: Uuid,
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub reason: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Ledger-adjacent Models
// ============================================================================

/// External money movement settled by the payment provider; the core only
/// consumes "points purchased" events keyed by provider_ref.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbPaymentTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub points: Decimal,
    pub amount: Decimal,
    pub currency: String,
    pub provider_ref: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbWithdrawal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub points: Decimal,
    pub destination: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> DbTask {
        DbTask {
            id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            social_network: "instagram".to_string(),
            task_type: "like".to_string(),
            post_url: "https://instagram.com/p/XYZ".to_string(),
            url_key: "instagram.com/p/XYZ".to_string(),
            price: Decimal::TEN,
            original_price: Decimal::ONE_HUNDRED,
            actions_required: 10,
            actions_completed: 4,
            bonus_actions: 3,
            bonus_actions_completed: 1,
            status: "active".to_string(),
            is_pinned: false,
            deletion_reason: None,
            created_at: Utc::now(),
            completed_at: None,
            completion_duration_secs: None,
        }
    }

    #[test]
    fn remaining_counts() {
        let task = sample_task();
        assert_eq!(task.main_remaining(), 6);
        assert_eq!(task.bonus_remaining(), 2);
        assert_eq!(task.task_status(), TaskStatus::Active);
    }

    #[test]
    fn unknown_profile_status_falls_back_to_free() {
        let profile = DbProfile {
            id: Uuid::new_v4(),
            balance: Decimal::ZERO,
            status: "gold".to_string(),
            available_tasks: 5,
            daily_task_limit: 5,
            chosen_country: None,
            country_code: None,
            completed_tasks_count: 0,
            bonus_tasks_completed: 0,
            game_rewards_claimed: 0,
            last_reward_at_task_count: 0,
            invited_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(profile.tier(), PlanTier::Free);
    }
}
