//! Boostpad Task Engine
//!
//! The transactional core of the task marketplace: task lifecycle, balance
//! accounting, pricing, duplicate detection, and feed assembly.
//!
//! # Concurrency model
//!
//! Every operation that touches a balance or a task counter runs inside a
//! single PostgreSQL transaction and takes `SELECT ... FOR UPDATE` row locks
//! before trusting any previously-read value. Lock order is always task row
//! first, then profile row, so concurrent completions and deletions on the
//! same task serialize without deadlocking. Unique constraints backstop the
//! races the optimistic pre-checks cannot close.

pub mod counters;
pub mod error;
pub mod feed;
pub mod ledger;
pub mod lifecycle;
pub mod notify;

pub use counters::{CounterSlot, Counters};
pub use error::{EngineError, EngineResult};
pub use feed::{rank_feed, FeedConfig, FeedExclusions};
pub use ledger::{PurchaseOutcome, WithdrawalOutcome};
pub use lifecycle::{
    CompletionOutcome, CreateTaskRequest, CreatedTask, DeletionOutcome, ReportOutcome,
};
pub use notify::{LogNotifier, Notifier, SharedNotifier};

use std::sync::Arc;

use sqlx::PgPool;

use boostpad_db::{CompletionRepo, PaymentRepo, ReportRepo, TaskRepo};
use boostpad_types::{NetworkRegistry, PricingConfig};

/// Transactional core of the marketplace.
///
/// Holds the connection pool directly rather than going through the
/// repositories: lifecycle operations need multi-statement transactions with
/// row locks, which the read-oriented repositories do not expose.
pub struct TaskEngine {
    pool: PgPool,
    pricing: PricingConfig,
    networks: NetworkRegistry,
    feed: FeedConfig,
    notifier: SharedNotifier,
}

impl TaskEngine {
    /// Engine with default pricing, networks, and feed settings, notifying
    /// through the tracing log.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            pricing: PricingConfig::default(),
            networks: NetworkRegistry::with_defaults(),
            feed: FeedConfig::default(),
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_feed_config(mut self, feed: FeedConfig) -> Self {
        self.feed = feed;
        self
    }

    pub fn with_notifier(mut self, notifier: SharedNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    pub fn networks(&self) -> &NetworkRegistry {
        &self.networks
    }

    // Read-path repositories over the same pool.
    fn task_repo(&self) -> TaskRepo {
        TaskRepo::new(self.pool.clone())
    }

    fn completion_repo(&self) -> CompletionRepo {
        CompletionRepo::new(self.pool.clone())
    }

    fn report_repo(&self) -> ReportRepo {
        ReportRepo::new(self.pool.clone())
    }

    fn payment_repo(&self) -> PaymentRepo {
        PaymentRepo::new(self.pool.clone())
    }
}
