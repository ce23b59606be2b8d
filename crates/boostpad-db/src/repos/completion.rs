//! Task completion repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{DbResult, DbTaskCompletion};

const COMPLETION_COLUMNS: &str =
    "id, task_id, user_id, action, post_url, metadata, completed_at";

/// Completion records are written only by the engine's complete-task
/// transaction; this repo serves the read side.
pub struct CompletionRepo {
    pool: PgPool,
}

impl CompletionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All completions by a user, newest first
    pub async fn list_by_user(&self, user_id: Uuid, limit: i64) -> DbResult<Vec<DbTaskCompletion>> {
        let completions = sqlx::query_as::<_, DbTaskCompletion>(&format!(
            r#"
            SELECT {COMPLETION_COLUMNS} FROM task_completions
            WHERE user_id = $1
            ORDER BY completed_at DESC
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(completions)
    }

    /// Everything the user has completed, joined with the task's network.
    /// Feeds the duplicate-key exclusion set: (post_url, action, network).
    pub async fn completed_work_keys(
        &self,
        user_id: Uuid,
    ) -> DbResult<Vec<(Uuid, String, String, String)>> {
        let rows: Vec<(Uuid, String, String, String)> = sqlx::query_as(
            r#"
            SELECT c.task_id, c.post_url, c.action, t.social_network
            FROM task_completions c
            JOIN tasks t ON t.id = c.task_id
            WHERE c.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
