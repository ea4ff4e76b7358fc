// file: src/database/announcements.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;

use crate::models::{Announcement, Priority};

#[derive(Debug, FromRow)]
struct AnnouncementRow {
    id: String,
    title: String,
    message: Option<String>,
    published_at: DateTime<Utc>,
    priority: String,
    meant_for: Option<String>,
}

#[derive(Debug, FromRow)]
struct SeenRow {
    announcement_id: String,
    user_id: String,
}

pub async fn insert(pool: &SqlitePool, announcement: &Announcement) -> Result<()> {
    sqlx::query(
        "INSERT INTO announcements (id, title, message, published_at, priority, meant_for) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&announcement.id)
    .bind(&announcement.title)
    .bind(&announcement.message)
    .bind(announcement.published_at)
    .bind(announcement.priority.as_str())
    .bind(&announcement.meant_for)
    .execute(pool)
    .await
    .context("Failed to insert announcement")?;

    for user_id in &announcement.seen_by {
        mark_seen(pool, &announcement.id, user_id).await?;
    }

    Ok(())
}

pub async fn delete(pool: &SqlitePool, announcement_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
        .bind(announcement_id)
        .execute(pool)
        .await
        .context("Failed to delete announcement")?;

    Ok(result.rows_affected() > 0)
}

/// Announcements the user may see and has not cleared, newest first.
pub async fn get_visible(pool: &SqlitePool, user_id: &str) -> Result<Vec<Announcement>> {
    let rows = sqlx::query_as::<_, AnnouncementRow>(
        r#"
        SELECT a.id, a.title, a.message, a.published_at, a.priority, a.meant_for
        FROM announcements a
        WHERE (a.meant_for IS NULL OR a.meant_for = ?)
            AND NOT EXISTS (
                SELECT 1 FROM announcement_clears c
                WHERE c.announcement_id = a.id AND c.user_id = ?
            )
        ORDER BY a.published_at DESC
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch announcements")?;

    let seen_rows = sqlx::query_as::<_, SeenRow>(
        r#"
        SELECT s.announcement_id, s.user_id
        FROM announcement_seen s
        JOIN announcements a ON a.id = s.announcement_id
        WHERE a.meant_for IS NULL OR a.meant_for = ?
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch announcement seen markers")?;

    let mut seen_by: HashMap<String, Vec<String>> = HashMap::new();
    for row in seen_rows {
        seen_by.entry(row.announcement_id).or_default().push(row.user_id);
    }

    let mut announcements = Vec::with_capacity(rows.len());
    for row in rows {
        let priority = match Priority::parse(&row.priority) {
            Ok(priority) => priority,
            Err(e) => {
                warn!("Skipping announcement {}: {}", row.id, e);
                continue;
            }
        };
        announcements.push(Announcement {
            seen_by: seen_by.remove(&row.id).unwrap_or_default().into_iter().collect(),
            id: row.id,
            title: row.title,
            message: row.message,
            published_at: row.published_at,
            priority,
            meant_for: row.meant_for,
        });
    }

    Ok(announcements)
}

pub async fn mark_seen(pool: &SqlitePool, announcement_id: &str, user_id: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO announcement_seen (announcement_id, user_id) VALUES (?, ?)")
        .bind(announcement_id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to mark announcement seen")?;

    Ok(())
}

/// Hides an announcement for one user. Only rows published at or before
/// `cutoff` are affected; returns `false` when nothing qualified.
pub async fn clear_for_user(
    pool: &SqlitePool,
    announcement_id: &str,
    user_id: &str,
    cutoff: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR REPLACE INTO announcement_clears (announcement_id, user_id, cleared_at)
        SELECT id, ?, CURRENT_TIMESTAMP FROM announcements
        WHERE id = ? AND published_at <= ?
        "#,
    )
    .bind(user_id)
    .bind(announcement_id)
    .bind(cutoff)
    .execute(pool)
    .await
    .context("Failed to clear announcement")?;

    Ok(result.rows_affected() > 0)
}
