//! Outbound notifications
//!
//! Side effects are fire-and-forget: failures are logged and swallowed, and
//! never roll back or fail the primary transaction. Dispatch happens after
//! commit on a spawned task.

use async_trait::async_trait;
use boostpad_db::DbTask;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

/// Notification sink for task lifecycle events
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn task_created(&self, task: &DbTask) -> anyhow::Result<()>;

    async fn task_completed(&self, task: &DbTask) -> anyhow::Result<()>;

    /// Sent to the creator when a task is deleted, with the refunded amount
    async fn task_deleted(&self, task: &DbTask, refund: Decimal) -> anyhow::Result<()>;
}

/// Default notifier: logs the event and sends nothing
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn task_created(&self, task: &DbTask) -> anyhow::Result<()> {
        info!(task_id = %task.id, network = %task.social_network, "task created");
        Ok(())
    }

    async fn task_completed(&self, task: &DbTask) -> anyhow::Result<()> {
        info!(task_id = %task.id, "task completed");
        Ok(())
    }

    async fn task_deleted(&self, task: &DbTask, refund: Decimal) -> anyhow::Result<()> {
        info!(task_id = %task.id, %refund, "task deleted");
        Ok(())
    }
}

/// Fire a notification without tying its outcome to the caller
pub(crate) fn spawn_notification<F>(description: &'static str, fut: F)
where
    F: std::future::Future<Output = anyhow::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = fut.await {
            warn!(error = %e, notification = description, "notification delivery failed");
        }
    });
}

/// Clone-friendly handle used by the engine
pub type SharedNotifier = Arc<dyn Notifier>;
