//! Task repository (read paths)

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::TASK_COLUMNS;
use crate::{DbFeedCandidate, DbResult, DbTask};

/// Task repository for lookups and feed candidate queries. Lifecycle writes
/// happen inside engine transactions, not here.
pub struct TaskRepo {
    pool: PgPool,
}

impl TaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find task by ID
    pub async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbTask>> {
        let task = sqlx::query_as::<_, DbTask>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Tasks created by a user, newest first
    pub async fn list_by_creator(&self, creator_id: Uuid, limit: i64) -> DbResult<Vec<DbTask>> {
        let tasks = sqlx::query_as::<_, DbTask>(&format!(
            r#"
            SELECT {TASK_COLUMNS} FROM tasks
            WHERE creator_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(creator_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    /// Find the ACTIVE task occupying a duplicate key, if any
    pub async fn find_active_duplicate(
        &self,
        url_key: &str,
        task_type: &str,
        social_network: &str,
    ) -> DbResult<Option<DbTask>> {
        let task = sqlx::query_as::<_, DbTask>(&format!(
            r#"
            SELECT {TASK_COLUMNS} FROM tasks
            WHERE url_key = $1 AND task_type = $2 AND social_network = $3 AND status = 'active'
            "#
        ))
        .bind(url_key)
        .bind(task_type)
        .bind(social_network)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// ACTIVE tasks from other creators joined with the creator's plan
    /// status, newest first, for feed assembly. The caller applies per-user
    /// exclusions and band ranking in memory.
    pub async fn list_feed_candidates(
        &self,
        requester: Uuid,
        social_network: Option<&str>,
        limit: i64,
    ) -> DbResult<Vec<DbFeedCandidate>> {
        let task_columns = prefixed_task_columns("t");
        let tasks = if let Some(network) = social_network {
            sqlx::query_as::<_, DbFeedCandidate>(&format!(
                r#"
                SELECT {task_columns}, p.status AS creator_status
                FROM tasks t JOIN profiles p ON p.id = t.creator_id
                WHERE t.status = 'active' AND t.creator_id != $1 AND t.social_network = $2
                ORDER BY t.created_at DESC
                LIMIT $3
                "#
            ))
            .bind(requester)
            .bind(network)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, DbFeedCandidate>(&format!(
                r#"
                SELECT {task_columns}, p.status AS creator_status
                FROM tasks t JOIN profiles p ON p.id = t.creator_id
                WHERE t.status = 'active' AND t.creator_id != $1
                ORDER BY t.created_at DESC
                LIMIT $2
                "#
            ))
            .bind(requester)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(tasks)
    }
}

/// Qualify the task column list with a table alias for joined queries
fn prefixed_task_columns(alias: &str) -> String {
    TASK_COLUMNS
        .split(", ")
        .map(|col| format!("{alias}.{}", col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
