//! Payment transaction repository
//!
//! Append-mostly records of settled point purchases. The provider's own
//! session/intent machinery is external; only the settled outcome lands here,
//! written by the engine's settlement transaction.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{DbPaymentTransaction, DbResult};

const PAYMENT_COLUMNS: &str =
    "id, user_id, points, amount, currency, provider_ref, status, created_at, settled_at";

pub struct PaymentRepo {
    pool: PgPool,
}

impl PaymentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up a settlement by the provider's reference (idempotency key)
    pub async fn find_by_provider_ref(
        &self,
        provider_ref: &str,
    ) -> DbResult<Option<DbPaymentTransaction>> {
        let txn = sqlx::query_as::<_, DbPaymentTransaction>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment_transactions WHERE provider_ref = $1"
        ))
        .bind(provider_ref)
        .fetch_optional(&self.pool)
        .await?;

        Ok(txn)
    }

    /// A user's purchase history, newest first
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> DbResult<Vec<DbPaymentTransaction>> {
        let txns = sqlx::query_as::<_, DbPaymentTransaction>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS} FROM payment_transactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(txns)
    }
}
