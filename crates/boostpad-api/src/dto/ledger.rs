//! Payment and withdrawal DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use boostpad_db::{DbPaymentTransaction, DbWithdrawal};
use boostpad_engine::{PurchaseOutcome, WithdrawalOutcome};

/// Provider-facing settlement notification
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SettlePurchaseRequest {
    /// User whose balance is credited
    pub user_id: Uuid,
    /// Provider's unique reference for this settlement
    #[validate(length(min = 1, max = 255))]
    pub provider_ref: String,
    /// Points purchased
    pub points: Decimal,
    /// Money amount settled by the provider
    pub amount: Decimal,
    /// ISO currency code
    #[validate(length(min = 3, max = 3))]
    pub currency: String,
}

/// Payment transaction record
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub points: Decimal,
    pub amount: Decimal,
    pub currency: String,
    pub provider_ref: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl From<DbPaymentTransaction> for PaymentResponse {
    fn from(txn: DbPaymentTransaction) -> Self {
        Self {
            id: txn.id,
            points: txn.points,
            amount: txn.amount,
            currency: txn.currency,
            provider_ref: txn.provider_ref,
            status: txn.status,
            created_at: txn.created_at,
            settled_at: txn.settled_at,
        }
    }
}

/// Settlement response
#[derive(Debug, Clone, Serialize)]
pub struct SettlePurchaseResponse {
    pub transaction: PaymentResponse,
    pub new_balance: Decimal,
    /// False when the provider_ref was already consumed
    pub credited: bool,
}

impl From<PurchaseOutcome> for SettlePurchaseResponse {
    fn from(outcome: PurchaseOutcome) -> Self {
        Self {
            transaction: outcome.transaction.into(),
            new_balance: outcome.new_balance,
            credited: outcome.credited,
        }
    }
}

/// Withdrawal request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWithdrawalRequest {
    /// Points to withdraw
    pub points: Decimal,
    /// Payout destination understood by the payout provider
    #[validate(length(min = 1, max = 255))]
    pub destination: String,
}

/// Withdrawal record
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalRecord {
    pub id: Uuid,
    pub points: Decimal,
    pub destination: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<DbWithdrawal> for WithdrawalRecord {
    fn from(w: DbWithdrawal) -> Self {
        Self {
            id: w.id,
            points: w.points,
            destination: w.destination,
            status: w.status,
            created_at: w.created_at,
            completed_at: w.completed_at,
            cancelled_at: w.cancelled_at,
        }
    }
}

/// Withdrawal response with the balance movement it caused
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalResponse {
    pub withdrawal: WithdrawalRecord,
    pub new_balance: Decimal,
}

impl From<WithdrawalOutcome> for WithdrawalResponse {
    fn from(outcome: WithdrawalOutcome) -> Self {
        Self { withdrawal: outcome.withdrawal.into(), new_balance: outcome.new_balance }
    }
}
