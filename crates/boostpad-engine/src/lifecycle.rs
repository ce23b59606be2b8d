//! Task lifecycle manager
//!
//! Create, complete-action, delete, and report-triggered transitions. Every
//! mutation runs inside one transaction per request with `FOR UPDATE` row
//! locks, Task row before UserProfile row, and every precondition is
//! re-validated after the lock is acquired - balances and task state can
//! change between an optimistic read and lock acquisition.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use boostpad_db::models::{PROFILE_COLUMNS, TASK_COLUMNS};
use boostpad_db::{DbError, DbProfile, DbTask};
use boostpad_types::{
    bonus_actions, normalize_url, refund, task_cost, ActionType, DeletionReason, ReportReason,
    TaskStatus,
};

use crate::counters::{CounterSlot, Counters};
use crate::error::{EngineError, EngineResult};
use crate::notify::spawn_notification;
use crate::TaskEngine;

/// Inputs for task creation
#[derive(Debug, Clone)]
pub struct CreateTaskRequest {
    pub creator: Uuid,
    pub social_network: String,
    pub task_type: ActionType,
    pub post_url: String,
    pub price: Decimal,
    pub actions_required: i32,
}

/// A freshly created task plus the balance movement it caused
#[derive(Debug, Clone, Serialize)]
pub struct CreatedTask {
    pub task: DbTask,
    pub discounted_cost: Decimal,
    pub new_balance: Decimal,
}

/// Result of one completed action
#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    pub reward: Decimal,
    pub new_balance: Decimal,
    pub task_status: TaskStatus,
}

/// Result of deleting a task
#[derive(Debug, Clone, Serialize)]
pub struct DeletionOutcome {
    pub refunded_points: Decimal,
    pub new_balance: Decimal,
    pub new_available_tasks: i32,
}

/// Result of filing a report
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub report_id: Uuid,
    pub task_status: TaskStatus,
    pub refunded_points: Option<Decimal>,
}

impl TaskEngine {
    /// Create a task: validate, price, debit the creator, insert.
    ///
    /// The duplicate check runs optimistically before the profile lock; the
    /// partial unique index on active tasks backstops the race.
    pub async fn create_task(&self, req: CreateTaskRequest) -> EngineResult<CreatedTask> {
        let post_url = req.post_url.trim().to_string();
        if post_url.is_empty() {
            return Err(EngineError::MissingField("post_url"));
        }
        if req.actions_required <= 0 {
            return Err(EngineError::InvalidTaskConfiguration(
                "actions_required must be positive".to_string(),
            ));
        }
        if req.price <= Decimal::ZERO {
            return Err(EngineError::InvalidTaskConfiguration(
                "price must be positive".to_string(),
            ));
        }

        let network = self
            .networks
            .get(&req.social_network)
            .ok_or_else(|| EngineError::UnknownNetwork(req.social_network.clone()))?;
        if !network.supports(req.task_type) {
            return Err(EngineError::InvalidActionForNetwork {
                network: network.code.to_string(),
                action: req.task_type.to_string(),
            });
        }
        if network.validate_url(&post_url).is_err() {
            return Err(EngineError::InvalidUrlFormat { network: network.code.to_string() });
        }

        let url_key = normalize_url(&post_url);
        let action = req.task_type.as_str();

        let mut tx = self.pool.begin().await.map_err(DbError::Query)?;

        if let Some((existing,)) = sqlx::query_as::<_, (Uuid,)>(
            r#"
            SELECT id FROM tasks
            WHERE url_key = $1 AND task_type = $2 AND social_network = $3 AND status = 'active'
            "#,
        )
        .bind(&url_key)
        .bind(action)
        .bind(network.code)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::Query)?
        {
            return Err(EngineError::DuplicateActiveTask { existing_task_id: existing });
        }

        // Lock the creator's profile; quota and balance are only trusted
        // once the lock is held.
        let profile = lock_profile(&mut tx, req.creator).await?;

        if profile.available_tasks <= 0 {
            return Err(EngineError::TaskQuotaExhausted);
        }

        let cost = task_cost(req.price, req.actions_required, profile.tier().discount_rate())?;
        if profile.balance < cost.discounted {
            return Err(EngineError::InsufficientBalance {
                required: cost.discounted,
                available: profile.balance,
            });
        }

        let bonus =
            bonus_actions(req.actions_required, profile.chosen_country.as_deref(), &self.pricing);

        sqlx::query(
            r#"
            UPDATE profiles
            SET balance = balance - $2, available_tasks = available_tasks - 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(req.creator)
        .bind(cost.discounted)
        .execute(&mut *tx)
        .await
        .map_err(DbError::Query)?;

        let inserted = sqlx::query_as::<_, DbTask>(&format!(
            r#"
            INSERT INTO tasks
                (creator_id, social_network, task_type, post_url, url_key,
                 price, original_price, actions_required, bonus_actions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(req.creator)
        .bind(network.code)
        .bind(action)
        .bind(&post_url)
        .bind(&url_key)
        .bind(req.price)
        .bind(cost.original)
        .bind(req.actions_required)
        .bind(bonus)
        .fetch_one(&mut *tx)
        .await;

        let task = match inserted {
            Ok(task) => task,
            Err(e) => {
                let db_err = DbError::Query(e);
                // A concurrent creation won the unique index; surface the
                // winner's id like the optimistic check would have.
                if is_active_dup_violation(&db_err) {
                    tx.rollback().await.ok();
                    let existing = self
                        .task_repo()
                        .find_active_duplicate(&url_key, action, network.code)
                        .await?;
                    if let Some(winner) = existing {
                        return Err(EngineError::DuplicateActiveTask {
                            existing_task_id: winner.id,
                        });
                    }
                }
                return Err(db_err.into());
            }
        };

        let new_balance = profile.balance - cost.discounted;
        tx.commit().await.map_err(DbError::Query)?;

        let notifier = self.notifier.clone();
        let created = task.clone();
        spawn_notification("task_created", async move { notifier.task_created(&created).await });

        Ok(CreatedTask { task, discounted_cost: cost.discounted, new_balance })
    }

    /// Record one user's completion of one action on a task.
    ///
    /// Advances the main or bonus counter per the alternation rule, stamps
    /// completion when both targets are met, and credits the completer's
    /// reward under their profile lock. Bonus slots pay nothing.
    pub async fn complete_task(
        &self,
        task_id: Uuid,
        user: Uuid,
        action: &str,
        metadata: Option<serde_json::Value>,
    ) -> EngineResult<CompletionOutcome> {
        if action.trim().is_empty() {
            return Err(EngineError::MissingField("action"));
        }

        let mut tx = self.pool.begin().await.map_err(DbError::Query)?;

        // Task row first, profile row second - consistent lock ordering.
        let task = lock_task(&mut tx, task_id).await?;

        if task.task_status() != TaskStatus::Active {
            return Err(EngineError::TaskNotActive(task_id));
        }
        if !action.trim().eq_ignore_ascii_case(&task.task_type) {
            return Err(EngineError::ActionTypeMismatch {
                expected: task.task_type.clone(),
                got: action.trim().to_string(),
            });
        }

        let already: Option<(i32,)> = sqlx::query_as(
            "SELECT 1 FROM task_completions WHERE task_id = $1 AND user_id = $2 AND action = $3",
        )
        .bind(task_id)
        .bind(user)
        .bind(&task.task_type)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::Query)?;
        if already.is_some() {
            return Err(EngineError::AlreadyCompleted);
        }

        sqlx::query(
            r#"
            INSERT INTO task_completions (task_id, user_id, action, post_url, metadata)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(task_id)
        .bind(user)
        .bind(&task.task_type)
        .bind(&task.post_url)
        .bind(metadata)
        .execute(&mut *tx)
        .await
        .map_err(EngineError::from_sqlx)?;

        let counters = Counters {
            actions_required: task.actions_required,
            actions_completed: task.actions_completed,
            bonus_actions: task.bonus_actions,
            bonus_actions_completed: task.bonus_actions_completed,
        };
        let slot = counters.next_slot();
        let advanced = counters.advanced(slot);

        match slot {
            CounterSlot::Main => {
                sqlx::query("UPDATE tasks SET actions_completed = actions_completed + 1 WHERE id = $1")
                    .bind(task_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(DbError::Query)?;
            }
            CounterSlot::Bonus => {
                sqlx::query(
                    "UPDATE tasks SET bonus_actions_completed = bonus_actions_completed + 1 WHERE id = $1",
                )
                .bind(task_id)
                .execute(&mut *tx)
                .await
                .map_err(DbError::Query)?;
            }
        }

        let mut task_status = TaskStatus::Active;
        if advanced.fulfilled() {
            task_status = TaskStatus::Completed;
            sqlx::query(
                r#"
                UPDATE tasks
                SET status = 'completed',
                    completed_at = NOW(),
                    completion_duration_secs = EXTRACT(EPOCH FROM (NOW() - created_at))::BIGINT
                WHERE id = $1
                "#,
            )
            .bind(task_id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::Query)?;
        }

        // Flat per-action reward, halved; independent of remaining work.
        let reward = match slot {
            CounterSlot::Main => {
                boostpad_types::completion_reward(task.original_price, task.actions_required)
            }
            CounterSlot::Bonus => Decimal::ZERO,
        };

        let profile = lock_profile(&mut tx, user).await?;

        sqlx::query(
            r#"
            UPDATE profiles
            SET balance = balance + $2,
                completed_tasks_count = completed_tasks_count + 1,
                bonus_tasks_completed = bonus_tasks_completed + 1,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user)
        .bind(reward)
        .execute(&mut *tx)
        .await
        .map_err(DbError::Query)?;

        let new_balance = profile.balance + reward;
        tx.commit().await.map_err(DbError::Query)?;

        if task_status == TaskStatus::Completed {
            let notifier = self.notifier.clone();
            let completed = task.clone();
            spawn_notification("task_completed", async move {
                notifier.task_completed(&completed).await
            });
        }

        Ok(CompletionOutcome { reward, new_balance, task_status })
    }

    /// Owner-initiated deletion: refund the unworked remainder at the
    /// creator's current discount rate, hand back one task slot, mark the
    /// task DELETED.
    pub async fn delete_task(&self, task_id: Uuid, owner: Uuid) -> EngineResult<DeletionOutcome> {
        let mut tx = self.pool.begin().await.map_err(DbError::Query)?;

        let task = lock_task(&mut tx, task_id).await?;
        if task.creator_id != owner {
            return Err(EngineError::NotTaskOwner);
        }
        if !task.task_status().is_deletable() {
            return Err(EngineError::InvalidTaskState(task.status.clone()));
        }

        let profile = lock_profile(&mut tx, owner).await?;
        let refunded = apply_refund_and_delete(
            &mut tx,
            &task,
            &profile,
            DeletionReason::OwnerRequest,
        )
        .await?;

        tx.commit().await.map_err(DbError::Query)?;

        let notifier = self.notifier.clone();
        let deleted = task.clone();
        spawn_notification("task_deleted", async move {
            notifier.task_deleted(&deleted, refunded).await
        });

        Ok(DeletionOutcome {
            refunded_points: refunded,
            new_balance: profile.balance + refunded,
            new_available_tasks: profile.available_tasks + 1,
        })
    }

    /// File a report. "not_available" on a still-ACTIVE task refunds and
    /// deletes it on the creator's behalf; "not_working" forces the task
    /// back to ACTIVE (idempotent, no balance effect). Other reasons are
    /// recorded for moderation only.
    pub async fn report_task(
        &self,
        task_id: Uuid,
        reporter: Uuid,
        reason: ReportReason,
        details: Option<String>,
    ) -> EngineResult<ReportOutcome> {
        let mut tx = self.pool.begin().await.map_err(DbError::Query)?;

        let task = lock_task(&mut tx, task_id).await?;

        let (report_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO task_reports (task_id, user_id, reason, details)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(task_id)
        .bind(reporter)
        .bind(reason.as_str())
        .bind(details)
        .fetch_one(&mut *tx)
        .await
        .map_err(EngineError::from_sqlx)?;

        let mut task_status = task.task_status();
        let mut refunded_points = None;

        match reason {
            ReportReason::NotAvailable if task_status == TaskStatus::Active => {
                let profile = lock_profile(&mut tx, task.creator_id).await?;
                let refunded = apply_refund_and_delete(
                    &mut tx,
                    &task,
                    &profile,
                    DeletionReason::LinkUnavailable,
                )
                .await?;

                task_status = TaskStatus::Deleted;
                refunded_points = Some(refunded);
            }
            ReportReason::NotWorking if task_status != TaskStatus::Completed => {
                // Counteracts an unwarranted availability report; no-op when
                // the task is already active.
                let reactivated = sqlx::query(
                    "UPDATE tasks SET status = 'active', deletion_reason = NULL WHERE id = $1",
                )
                .bind(task_id)
                .execute(&mut *tx)
                .await;
                if let Err(e) = reactivated {
                    let db_err = DbError::Query(e);
                    // Another active task may have claimed the same work key
                    // while this one was deleted; surface it as the conflict
                    // it is, not a raw database error.
                    if is_active_dup_violation(&db_err) {
                        tx.rollback().await.ok();
                        let existing = self
                            .task_repo()
                            .find_active_duplicate(
                                &task.url_key,
                                &task.task_type,
                                &task.social_network,
                            )
                            .await?;
                        if let Some(winner) = existing {
                            return Err(EngineError::DuplicateActiveTask {
                                existing_task_id: winner.id,
                            });
                        }
                    }
                    return Err(db_err.into());
                }
                task_status = TaskStatus::Active;
            }
            _ => {}
        }

        tx.commit().await.map_err(DbError::Query)?;

        if let Some(refunded) = refunded_points {
            let notifier = self.notifier.clone();
            let deleted = task.clone();
            spawn_notification("task_deleted", async move {
                notifier.task_deleted(&deleted, refunded).await
            });
        }

        Ok(ReportOutcome { report_id, task_status, refunded_points })
    }
}

/// Whether a write tripped the partial unique index over active tasks'
/// (url_key, task_type, social_network). Both the insert path and the
/// reactivation path translate this into `DuplicateActiveTask`.
fn is_active_dup_violation(db_err: &DbError) -> bool {
    db_err.constraint_name() == Some("tasks_active_dup_key")
}

/// `SELECT ... FOR UPDATE` on a task row
async fn lock_task(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    task_id: Uuid,
) -> EngineResult<DbTask> {
    sqlx::query_as::<_, DbTask>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 FOR UPDATE"
    ))
    .bind(task_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(DbError::Query)?
    .ok_or(EngineError::TaskNotFound(task_id))
}

/// `SELECT ... FOR UPDATE` on a profile row
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

/// Shared refund-and-delete effect for owner deletion and availability
/// reports. Caller holds both row locks.
async fn apply_refund_and_delete(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    task: &DbTask,
    creator: &DbProfile,
    reason: DeletionReason,
) -> EngineResult<Decimal> {
    let refunded = refund(
        task.original_price,
        task.actions_required,
        task.actions_completed,
        creator.tier().discount_rate(),
    )?;

    sqlx::query(
        r#"
        UPDATE profiles
        SET balance = balance + $2, available_tasks = available_tasks + 1, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(creator.id)
    .bind(refunded)
    .execute(&mut **tx)
    .await
    .map_err(DbError::Query)?;

    sqlx::query("UPDATE tasks SET status = 'deleted', deletion_reason = $2 WHERE id = $1")
        .bind(task.id)
        .bind(reason.as_str())
        .execute(&mut **tx)
        .await
        .map_err(DbError::Query)?;

    Ok(refunded)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only the driver-reported constraint name selects the duplicate-task
    // translation; the conflict conversion must never fire for other errors.
    #[test]
    fn dup_index_detection_requires_the_constraint_name() {
        assert!(!is_active_dup_violation(&DbError::NotFound("task".into())));
        assert!(!is_active_dup_violation(&DbError::Query(sqlx::Error::RowNotFound)));
        assert!(!is_active_dup_violation(&DbError::Constraint(
            "tasks_active_dup_key".into(),
        )));
    }
}
