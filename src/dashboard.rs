// Per-session dashboard state.
//
// Owns the announcement and notification collections, the calendar board and
// the live announcement subscription for one signed-in user. Dropped or shut
// down on logout.

use log::{info, warn};

use crate::calendar::{CalendarBoard, CalendarSync};
use crate::config::REPORT_PAGE_SIZE;
use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::notice::NoticeSender;
use crate::models::{PerformancePage, Session};
use crate::realtime::Subscription;
use crate::reconciler::{AnnouncementReconciler, NotificationReconciler};
use crate::utils::logging;

pub struct Dashboard {
    db: Database,
    session: Session,
    pub announcements: AnnouncementReconciler,
    pub notifications: NotificationReconciler,
    pub calendar: CalendarBoard,
    subscription: Option<Subscription>,
}

impl Dashboard {
    /// Opens the push subscription, then loads both collections and the
    /// calendar concurrently. Read failures leave the affected view empty.
    pub async fn start(
        db: Database,
        sync: CalendarSync,
        session: Session,
        notices: Option<NoticeSender>,
    ) -> Self {
        let mut dashboard = Self {
            announcements: AnnouncementReconciler::new(db.clone(), notices.clone()),
            notifications: NotificationReconciler::new(db.clone(), notices.clone()),
            calendar: CalendarBoard::new(db.clone(), sync, notices),
            db,
            session,
            subscription: None,
        };

        // Subscribe first: anything pushed during the fetch is reconciled, not lost.
        dashboard.subscription = Some(dashboard.announcements.listen_for_updates(&dashboard.session));

        let session = &dashboard.session;
        let (announcements, notifications, events) = tokio::join!(
            dashboard.announcements.load_all(session),
            dashboard.notifications.load_all(session),
            dashboard.calendar.refresh(session),
        );

        if let Err(e) = announcements {
            warn!("Announcements unavailable: {}", e);
        }
        if let Err(e) = notifications {
            warn!("Notifications unavailable: {}", e);
        }

        info!(
            "Dashboard ready for {}: {} announcements, {} notifications, {} calendar events",
            dashboard.session.user_id,
            dashboard.announcements.items().len(),
            dashboard.notifications.unseen().len() + dashboard.notifications.seen().len(),
            events
        );

        dashboard
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_live(&self) -> bool {
        self.subscription.as_ref().is_some_and(|s| !s.is_released())
    }

    /// Waits for the next pushed announcement change and applies it.
    /// Returns `None` once the subscription is gone.
    pub async fn next_update(&mut self) -> Option<bool> {
        let event = self.subscription.as_mut()?.next().await?;
        Some(self.announcements.apply(&self.session, event).await)
    }

    /// Applies every change already queued without waiting.
    pub async fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.subscription.as_mut().and_then(|s| s.try_next()) {
            if self.announcements.apply(&self.session, event).await {
                applied += 1;
            }
        }
        applied
    }

    /// Badge count shown in the header.
    pub fn unseen_total(&self) -> usize {
        self.announcements.unseen_count(&self.session.user_id) + self.notifications.unseen_count()
    }

    pub async fn performance_report(&self, page: usize) -> AppResult<PerformancePage> {
        if !self.session.role.is_admin() {
            return Err(AppError::permission_denied("Performance report is for administrators"));
        }
        performance_report(&self.db, page, REPORT_PAGE_SIZE).await
    }

    /// Releases the subscription, forgets the calendar token and clears all
    /// local state. Writes already issued are not cancelled.
    pub async fn shutdown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
        }
        self.calendar.sync().tokens().clear().await;
        self.announcements.reset();
        self.notifications.reset();
        self.calendar.reset();
        info!("Dashboard closed for {}", self.session.user_id);
    }
}

/// Lawyer performance, ordered by name and sliced into 1-based pages.
pub async fn performance_report(db: &Database, page: usize, per_page: usize) -> AppResult<PerformancePage> {
    let rows = db.get_lawyer_performance().await.map_err(|e| {
        logging::log_error_with_context(&e, "performance report");
        AppError::read_failed("Could not load the performance report")
    })?;
    Ok(PerformancePage::paginate(rows, page, per_page))
}
