// file: src/database/notifications.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use sqlx::{FromRow, SqlitePool};

use crate::models::{Notification, NotificationKind};

#[derive(Debug, FromRow)]
struct NotificationRow {
    id: String,
    user_id: String,
    notification_type: String,
    notification_name: String,
    case_id: Option<String>,
    task_id: Option<String>,
    appointment_id: Option<String>,
    case_no: Option<String>,
    task_name: Option<String>,
    appointment_name: Option<String>,
    seen: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = String;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let missing = |field: &str| format!("notification {} is missing {}", row.id, field);
        let kind = match row.notification_type.to_uppercase().as_str() {
            "CASE" => NotificationKind::Case {
                case_id: row.case_id.clone().ok_or_else(|| missing("case_id"))?,
                case_no: row.case_no.clone(),
            },
            "TASK" => NotificationKind::Task {
                task_id: row.task_id.clone().ok_or_else(|| missing("task_id"))?,
                task_name: row.task_name.clone(),
            },
            "APPOINTMENT" => NotificationKind::Appointment {
                appointment_id: row.appointment_id.clone().ok_or_else(|| missing("appointment_id"))?,
                appointment_name: row.appointment_name.clone(),
            },
            other => return Err(format!("notification {} has unknown type {}", row.id, other)),
        };

        Ok(Notification {
            id: row.id,
            user_id: row.user_id,
            notification_name: row.notification_name,
            kind,
            seen: row.seen,
            created_at: row.created_at,
        })
    }
}

pub async fn insert(pool: &SqlitePool, notification: &Notification) -> Result<()> {
    let (case_id, case_no, task_id, task_name, appointment_id, appointment_name) = match &notification.kind {
        NotificationKind::Case { case_id, case_no } => (Some(case_id), case_no.as_ref(), None, None, None, None),
        NotificationKind::Task { task_id, task_name } => (None, None, Some(task_id), task_name.as_ref(), None, None),
        NotificationKind::Appointment { appointment_id, appointment_name } => {
            (None, None, None, None, Some(appointment_id), appointment_name.as_ref())
        }
    };

    sqlx::query(
        r#"
        INSERT INTO notifications
            (id, user_id, notification_type, notification_name, case_id, task_id, appointment_id,
             case_no, task_name, appointment_name, seen, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&notification.id)
    .bind(&notification.user_id)
    .bind(notification.kind.type_name())
    .bind(&notification.notification_name)
    .bind(case_id)
    .bind(task_id)
    .bind(appointment_id)
    .bind(case_no)
    .bind(task_name)
    .bind(appointment_name)
    .bind(notification.seen)
    .bind(notification.created_at)
    .execute(pool)
    .await
    .context("Failed to insert notification")?;

    Ok(())
}

/// All notifications addressed to the user, newest first.
pub async fn get_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Notification>> {
    let rows = sqlx::query_as::<_, NotificationRow>(
        r#"
        SELECT id, user_id, notification_type, notification_name, case_id, task_id, appointment_id,
               case_no, task_name, appointment_name, seen, created_at
        FROM notifications
        WHERE user_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch notifications")?;

    Ok(rows
        .into_iter()
        .filter_map(|row| match Notification::try_from(row) {
            Ok(notification) => Some(notification),
            Err(e) => {
                warn!("Skipping malformed notification: {}", e);
                None
            }
        })
        .collect())
}

pub async fn mark_seen(pool: &SqlitePool, notification_id: &str) -> Result<()> {
    sqlx::query("UPDATE notifications SET seen = 1 WHERE id = ?")
        .bind(notification_id)
        .execute(pool)
        .await
        .context("Failed to mark notification seen")?;

    Ok(())
}

pub async fn delete(pool: &SqlitePool, notification_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM notifications WHERE id = ?")
        .bind(notification_id)
        .execute(pool)
        .await
        .context("Failed to delete notification")?;

    Ok(())
}

pub async fn delete_all_for_user(pool: &SqlitePool, user_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM notifications WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to delete notifications")?;

    Ok(result.rows_affected())
}
