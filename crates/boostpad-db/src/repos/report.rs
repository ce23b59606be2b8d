//! Task report repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{DbResult, DbTaskReport};

const REPORT_COLUMNS: &str = "id, task_id, user_id, reason, details, created_at";

pub struct ReportRepo {
    pool: PgPool,
}

impl ReportRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user's report on a task
    pub async fn find(&self, task_id: Uuid, user_id: Uuid) -> DbResult<Option<DbTaskReport>> {
        let report = sqlx::query_as::<_, DbTaskReport>(&format!(
            "SELECT {REPORT_COLUMNS} FROM task_reports WHERE task_id = $1 AND user_id = $2"
        ))
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }

    /// Task IDs the user has reported; excluded from their feed
    pub async fn task_ids_reported_by(&self, user_id: Uuid) -> DbResult<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("SELECT task_id FROM task_reports WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Reports filed against a task, newest first
    pub async fn list_for_task(&self, task_id: Uuid) -> DbResult<Vec<DbTaskReport>> {
        let reports = sqlx::query_as::<_, DbTaskReport>(&format!(
            "SELECT {REPORT_COLUMNS} FROM task_reports WHERE task_id = $1 ORDER BY created_at DESC"
        ))
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }
}
