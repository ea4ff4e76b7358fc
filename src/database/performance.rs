// file: src/database/performance.rs
use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::records::{CASE_DECIDED, TASK_COMPLETED};
use crate::models::LawyerPerformance;

pub async fn add_lawyer(pool: &SqlitePool, id: &str, name: &str, email: Option<&str>) -> Result<()> {
    sqlx::query("INSERT OR REPLACE INTO lawyers (id, name, email) VALUES (?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(email)
        .execute(pool)
        .await
        .context("Failed to save lawyer")?;

    Ok(())
}

/// One row per lawyer, ordered by name.
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<LawyerPerformance>> {
    let rows = sqlx::query_as::<_, LawyerPerformance>(
        r#"
        SELECT
            l.id AS lawyer_id,
            l.name AS lawyer_name,
            (SELECT COUNT(*) FROM tasks t WHERE t.lawyer_id = l.id) AS total_tasks,
            (SELECT COUNT(*) FROM cases c WHERE c.lawyer_id = l.id) AS total_cases,
            (SELECT COUNT(*) FROM tasks t WHERE t.lawyer_id = l.id AND t.task_status = ?) AS completed_tasks,
            (SELECT COUNT(*) FROM cases c WHERE c.lawyer_id = l.id AND c.case_status = ?) AS decided_cases
        FROM lawyers l
        ORDER BY l.name ASC, l.id ASC
        "#,
    )
    .bind(TASK_COMPLETED)
    .bind(CASE_DECIDED)
    .fetch_all(pool)
    .await
    .context("Failed to compute performance report")?;

    Ok(rows)
}
