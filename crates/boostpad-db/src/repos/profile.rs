//! Profile repository

use boostpad_types::PlanTier;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::PROFILE_COLUMNS;
use crate::{DbProfile, DbResult};

/// Profile repository for read paths and non-ledger mutations.
///
/// Balance-affecting writes do not live here; they run inside the engine's
/// transactions with the profile row locked.
pub struct ProfileRepo {
    pool: PgPool,
}

impl ProfileRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch or lazily create the profile for an identity-provider subject.
    /// Profiles are created at first authentication with free-tier defaults.
    pub async fn ensure(&self, user_id: Uuid, invited_by: Option<Uuid>) -> DbResult<DbProfile> {
        let limit = PlanTier::Free.daily_task_limit();
        let profile = sqlx::query_as::<_, DbProfile>(&format!(
            r#"
            INSERT INTO profiles (id, available_tasks, daily_task_limit, invited_by)
            VALUES ($1, $2, $2, $3)
            ON CONFLICT (id) DO UPDATE SET updated_at = NOW()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(invited_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Find profile by ID
    pub async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbProfile>> {
        let profile = sqlx::query_as::<_, DbProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Update the country used for bonus-action eligibility
    pub async fn set_chosen_country(&self, id: Uuid, country: Option<&str>) -> DbResult<()> {
        sqlx::query(
            "UPDATE profiles SET chosen_country = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(country.map(|c| c.to_ascii_uppercase()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Change the subscription tier and refresh the daily quota ceiling
    pub async fn set_plan(&self, id: Uuid, tier: PlanTier) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE profiles
            SET status = $2, daily_task_limit = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(tier.as_str())
        .bind(tier.daily_task_limit())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
