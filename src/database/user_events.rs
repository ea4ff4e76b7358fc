// file: src/database/user_events.rs
use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::records::validated;
use crate::models::records::UserEventRow;
use crate::models::{EventDraft, UserEventRecord};

pub async fn get_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<UserEventRecord>> {
    let rows = sqlx::query_as::<_, UserEventRow>(
        "SELECT id, user_id, title, start FROM user_events WHERE user_id = ? ORDER BY created_at ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch user events")?;

    Ok(validated(rows))
}

pub async fn insert(pool: &SqlitePool, user_id: &str, draft: &EventDraft) -> Result<UserEventRecord> {
    let record = UserEventRecord {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        title: draft.title.clone(),
        start: draft.start.clone(),
    };

    sqlx::query("INSERT INTO user_events (id, user_id, title, start) VALUES (?, ?, ?, ?)")
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.title)
        .bind(&record.start)
        .execute(pool)
        .await
        .context("Failed to save user event")?;

    Ok(record)
}
