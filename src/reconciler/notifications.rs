use log::{error, info, warn};

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::notice::{emit, NoticeSender};
use crate::models::{Notice, Notification, Session};

/// Notifications split into unseen and seen, each newest first.
pub struct NotificationReconciler {
    db: Database,
    unseen: Vec<Notification>,
    seen: Vec<Notification>,
    notices: Option<NoticeSender>,
}

impl NotificationReconciler {
    pub fn new(db: Database, notices: Option<NoticeSender>) -> Self {
        Self { db, unseen: Vec::new(), seen: Vec::new(), notices }
    }

    pub fn unseen(&self) -> &[Notification] {
        &self.unseen
    }

    pub fn seen(&self) -> &[Notification] {
        &self.seen
    }

    pub fn unseen_count(&self) -> usize {
        self.unseen.len()
    }

    pub async fn load_all(&mut self, session: &Session) -> AppResult<usize> {
        let fetched = self.db.get_notifications(&session.user_id).await.map_err(|e| {
            error!("Failed to load notifications for {}: {}", session.user_id, e);
            AppError::read_failed("Could not load notifications")
        })?;

        let (seen, unseen): (Vec<_>, Vec<_>) = fetched.into_iter().partition(|n| n.seen);
        self.seen = seen;
        self.unseen = unseen;
        Ok(self.seen.len() + self.unseen.len())
    }

    /// Moves one notification to the seen list. Already-seen ids are a no-op.
    pub async fn mark_seen(&mut self, notification_id: &str) -> AppResult<()> {
        let Some(index) = self.unseen.iter().position(|n| n.id == notification_id) else {
            if self.seen.iter().any(|n| n.id == notification_id) {
                return Ok(());
            }
            return Err(AppError::not_found(format!("Notification {}", notification_id)));
        };

        let mut notification = self.unseen.remove(index);
        notification.seen = true;
        self.insert_seen(notification);

        if let Err(e) = self.db.mark_notification_seen(notification_id).await {
            warn!("Failed to record notification {} as seen: {}", notification_id, e);
        }
        Ok(())
    }

    /// Opening the panel marks every unseen notification seen. Returns the
    /// number of store writes issued, zero when nothing was unseen.
    pub async fn open_panel(&mut self) -> usize {
        let moved: Vec<Notification> = self.unseen.drain(..).collect();
        let count = moved.len();

        for mut notification in moved {
            notification.seen = true;
            if let Err(e) = self.db.mark_notification_seen(&notification.id).await {
                warn!("Failed to record notification {} as seen: {}", notification.id, e);
            }
            self.insert_seen(notification);
        }

        if count > 0 {
            info!("Marked {} notifications seen", count);
        }
        count
    }

    /// Deletes a notification wherever it sits. There is no age lock. If the
    /// store delete fails the notification is put back where it was.
    pub async fn clear(&mut self, notification_id: &str) -> AppResult<()> {
        let (list, index) = if let Some(index) = self.unseen.iter().position(|n| n.id == notification_id) {
            (&mut self.unseen, index)
        } else if let Some(index) = self.seen.iter().position(|n| n.id == notification_id) {
            (&mut self.seen, index)
        } else {
            return Err(AppError::not_found(format!("Notification {}", notification_id)));
        };
        let removed = list.remove(index);

        if let Err(e) = self.db.delete_notification(notification_id).await {
            error!("Error deleting notification {}: {}", notification_id, e);
            if removed.seen {
                self.seen.insert(index, removed);
            } else {
                self.unseen.insert(index, removed);
            }
            return Err(AppError::write_failed("Could not delete notification"));
        }
        Ok(())
    }

    pub async fn clear_all(&mut self, session: &Session) -> AppResult<()> {
        self.unseen.clear();
        self.seen.clear();

        if let Err(e) = self.db.delete_all_notifications(&session.user_id).await {
            error!("Error clearing notifications for {}: {}", session.user_id, e);
            emit(&self.notices, Notice::error("Error", "Could not clear notifications"));
            return Err(AppError::write_failed("Could not clear notifications"));
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.unseen.clear();
        self.seen.clear();
    }

    fn insert_seen(&mut self, notification: Notification) {
        let index = self
            .seen
            .iter()
            .position(|n| n.created_at < notification.created_at)
            .unwrap_or(self.seen.len());
        self.seen.insert(index, notification);
    }
}
