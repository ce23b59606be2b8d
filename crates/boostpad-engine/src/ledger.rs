//! Balance ledger operations
//!
//! Point purchases and withdrawals. Same discipline as the lifecycle
//! transactions: profile row locked before any balance-dependent decision,
//! precondition re-validated under the lock, no clamping - a debit that
//! would go negative is rejected, never truncated.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use boostpad_db::models::PROFILE_COLUMNS;
use boostpad_db::{DbError, DbPaymentTransaction, DbProfile, DbWithdrawal};

use crate::error::{EngineError, EngineResult};
use crate::TaskEngine;

const PAYMENT_COLUMNS: &str =
    "id, user_id, points, amount, currency, provider_ref, status, created_at, settled_at";

const WITHDRAWAL_COLUMNS: &str =
    "id, user_id, points, destination, status, created_at, completed_at, cancelled_at";

/// Result of consuming a settled purchase event
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOutcome {
    pub transaction: DbPaymentTransaction,
    pub new_balance: Decimal,
    /// False when the provider_ref was already consumed and no credit moved
    pub credited: bool,
}

/// Result of a withdrawal request or cancellation
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalOutcome {
    pub withdrawal: DbWithdrawal,
    pub new_balance: Decimal,
}

impl TaskEngine {
    /// Consume a "points purchased" settlement from the payment provider.
    ///
    /// Idempotent per provider_ref: replayed events return the recorded
    /// transaction without crediting again.
    pub async fn settle_purchase(
        &self,
        user: Uuid,
        provider_ref: &str,
        points: Decimal,
        amount: Decimal,
        currency: &str,
    ) -> EngineResult<PurchaseOutcome> {
        if provider_ref.trim().is_empty() {
            return Err(EngineError::MissingField("provider_ref"));
        }
        if points <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount("points must be positive"));
        }

        let mut tx = self.pool.begin().await.map_err(DbError::Query)?;

        let profile = lock_profile(&mut tx, user).await?;

        let inserted = sqlx::query_as::<_, DbPaymentTransaction>(&format!(
            r#"
            INSERT INTO payment_transactions (user_id, points, amount, currency, provider_ref, settled_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(user)
        .bind(points)
        .bind(amount)
        .bind(currency)
        .bind(provider_ref.trim())
        .fetch_one(&mut *tx)
        .await;

        let transaction = match inserted {
            Ok(txn) => txn,
            Err(e) => {
                let db_err = DbError::Query(e);
                if db_err.constraint_name() == Some("payment_transactions_provider_ref_key") {
                    // Replayed webhook: hand back the original record.
                    tx.rollback().await.ok();
                    let existing = self
                        .payment_repo()
                        .find_by_provider_ref(provider_ref.trim())
                        .await?
                        .ok_or(db_err)?;
                    return Ok(PurchaseOutcome {
                        new_balance: profile.balance,
                        transaction: existing,
                        credited: false,
                    });
                }
                return Err(db_err.into());
            }
        };

        sqlx::query("UPDATE profiles SET balance = balance + $2, updated_at = NOW() WHERE id = $1")
            .bind(user)
            .bind(points)
            .execute(&mut *tx)
            .await
            .map_err(DbError::Query)?;

        let new_balance = profile.balance + points;
        tx.commit().await.map_err(DbError::Query)?;

        Ok(PurchaseOutcome { transaction, new_balance, credited: true })
    }

    /// Debit points into a pending withdrawal. The balance check happens
    /// only after the profile lock is held.
    pub async fn request_withdrawal(
        &self,
        user: Uuid,
        points: Decimal,
        destination: &str,
    ) -> EngineResult<WithdrawalOutcome> {
        if destination.trim().is_empty() {
            return Err(EngineError::MissingField("destination"));
        }
        if points <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount("points must be positive"));
        }

        let mut tx = self.pool.begin().await.map_err(DbError::Query)?;

        let profile = lock_profile(&mut tx, user).await?;
        if profile.balance < points {
            return Err(EngineError::InsufficientBalance {
                required: points,
                available: profile.balance,
            });
        }

        sqlx::query("UPDATE profiles SET balance = balance - $2, updated_at = NOW() WHERE id = $1")
            .bind(user)
            .bind(points)
            .execute(&mut *tx)
            .await
            .map_err(DbError::Query)?;

        let withdrawal = sqlx::query_as::<_, DbWithdrawal>(&format!(
            r#"
            INSERT INTO withdrawals (user_id, points, destination)
            VALUES ($1, $2, $3)
            RETURNING {WITHDRAWAL_COLUMNS}
            "#
        ))
        .bind(user)
        .bind(points)
        .bind(destination.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::Query)?;

        let new_balance = profile.balance - points;
        tx.commit().await.map_err(DbError::Query)?;

        Ok(WithdrawalOutcome { withdrawal, new_balance })
    }

    /// Cancel a pending withdrawal and credit the points back
    pub async fn cancel_withdrawal(
        &self,
        withdrawal_id: Uuid,
        user: Uuid,
    ) -> EngineResult<WithdrawalOutcome> {
        let mut tx = self.pool.begin().await.map_err(DbError::Query)?;

        let withdrawal = sqlx::query_as::<_, DbWithdrawal>(&format!(
            "SELECT {WITHDRAWAL_COLUMNS} FROM withdrawals WHERE id = $1 FOR UPDATE"
        ))
        .bind(withdrawal_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::Query)?
        .ok_or(EngineError::WithdrawalNotFound(withdrawal_id))?;

        if withdrawal.user_id != user {
            return Err(EngineError::WithdrawalNotFound(withdrawal_id));
        }
        if withdrawal.status != "pending" {
            return Err(EngineError::InvalidWithdrawalState(withdrawal.status.clone()));
        }

        let profile = lock_profile(&mut tx, user).await?;

        sqlx::query("UPDATE profiles SET balance = balance + $2, updated_at = NOW() WHERE id = $1")
            .bind(user)
            .bind(withdrawal.points)
            .execute(&mut *tx)
            .await
            .map_err(DbError::Query)?;

        let withdrawal = sqlx::query_as::<_, DbWithdrawal>(&format!(
            r#"
            UPDATE withdrawals SET status = 'cancelled', cancelled_at = NOW()
            WHERE id = $1
            RETURNING {WITHDRAWAL_COLUMNS}
            "#
        ))
        .bind(withdrawal_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::Query)?;

        let new_balance = profile.balance + withdrawal.points;
        tx.commit().await.map_err(DbError::Query)?;

        Ok(WithdrawalOutcome { withdrawal, new_balance })
    }

    /// Mark a pending withdrawal completed once the provider confirms the
    /// payout; the points already left the balance at request time.
    pub async fn complete_withdrawal(&self, withdrawal_id: Uuid) -> EngineResult<DbWithdrawal> {
        let withdrawal = sqlx::query_as::<_, DbWithdrawal>(&format!(
            r#"
            UPDATE withdrawals SET status = 'completed', completed_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {WITHDRAWAL_COLUMNS}
            "#
        ))
        .bind(withdrawal_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)?
        .ok_or(EngineError::WithdrawalNotFound(withdrawal_id))?;

        Ok(withdrawal)
    }
}

async fn lock_profile(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: Uuid,
) -> EngineResult<DbProfile> {
    sqlx::query_as::<_, DbProfile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1 FOR UPDATE"
    ))
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(DbError::Query)?
    .ok_or(EngineError::ProfileNotFound(user_id))
}
