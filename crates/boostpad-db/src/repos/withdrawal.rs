//! Withdrawal repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{DbResult, DbWithdrawal};

const WITHDRAWAL_COLUMNS: &str =
    "id, user_id, points, destination, status, created_at, completed_at, cancelled_at";

pub struct WithdrawalRepo {
    pool: PgPool,
}

impl WithdrawalRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find withdrawal by ID
    pub async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbWithdrawal>> {
        let withdrawal = sqlx::query_as::<_, DbWithdrawal>(&format!(
            "SELECT {WITHDRAWAL_COLUMNS} FROM withdrawals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(withdrawal)
    }

    /// A user's withdrawal history, newest first
    pub async fn list_by_user(&self, user_id: Uuid, limit: i64) -> DbResult<Vec<DbWithdrawal>> {
        let withdrawals = sqlx::query_as::<_, DbWithdrawal>(&format!(
            r#"
            SELECT {WITHDRAWAL_COLUMNS} FROM withdrawals
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(withdrawals)
    }
}
