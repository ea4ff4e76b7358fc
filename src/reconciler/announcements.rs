use chrono::{Duration, Utc};
use log::{debug, error, info, warn};
use std::collections::HashSet;

use crate::config::CLEAR_LOCK_DAYS;
use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::notice::{emit, NoticeSender};
use crate::models::{Announcement, Notice, Session};
use crate::realtime::{FeedEvent, Subscription};

const TOO_RECENT: &str = "Announcement cannot be cleared within 30 days of publishing";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub cleared: Vec<String>,
    pub retained: usize,
}

pub struct AnnouncementReconciler {
    db: Database,
    items: Vec<Announcement>,
    /// Ids inserted by push since the last fetch was reconciled.
    pushed: HashSet<String>,
    /// Ids removed by push; a fetch that raced the delete must not revive them.
    tombstones: HashSet<String>,
    notices: Option<NoticeSender>,
}

impl AnnouncementReconciler {
    pub fn new(db: Database, notices: Option<NoticeSender>) -> Self {
        Self {
            db,
            items: Vec::new(),
            pushed: HashSet::new(),
            tombstones: HashSet::new(),
            notices,
        }
    }

    pub fn items(&self) -> &[Announcement] {
        &self.items
    }

    /// Opens the push subscription for this user's announcements.
    pub fn listen_for_updates(&self, session: &Session) -> Subscription {
        self.db.subscribe_announcements(&session.user_id)
    }

    /// Applies one pushed change. Returns `true` when the local collection changed.
    pub async fn apply(&mut self, session: &Session, event: FeedEvent) -> bool {
        match event {
            FeedEvent::Inserted(announcement) => {
                if !announcement.is_visible_to(&session.user_id) {
                    return false;
                }
                if self.items.iter().any(|a| a.id == announcement.id) {
                    debug!("Ignoring duplicate announcement {}", announcement.id);
                    return false;
                }
                info!("New announcement: {}", announcement.title);
                emit(
                    &self.notices,
                    Notice::info(announcement.title.clone(), announcement.message.clone()),
                );
                self.pushed.insert(announcement.id.clone());
                self.items.insert(0, announcement);
                true
            }
            FeedEvent::Deleted(id) => {
                self.tombstones.insert(id.clone());
                self.pushed.remove(&id);
                let before = self.items.len();
                self.items.retain(|a| a.id != id);
                before != self.items.len()
            }
        }
    }

    /// Fetches the user's visible announcements and reconciles them with
    /// whatever the push channel delivered meanwhile. On a read failure the
    /// current collection is kept.
    pub async fn load_all(&mut self, session: &Session) -> AppResult<usize> {
        match self.db.get_visible_announcements(&session.user_id).await {
            Ok(fetched) => {
                self.reconcile_fetch(fetched);
                Ok(self.items.len())
            }
            Err(e) => {
                error!("Failed to load announcements for {}: {}", session.user_id, e);
                Err(AppError::read_failed("Could not load announcements"))
            }
        }
    }

    /// Merges a fetch result into the local collection.
    ///
    /// Pushed inserts the fetch does not know about yet stay at the front,
    /// pushed deletes win over the fetch, and ids appear at most once.
    pub fn reconcile_fetch(&mut self, fetched: Vec<Announcement>) {
        let fetched_ids: HashSet<String> = fetched.iter().map(|a| a.id.clone()).collect();

        let mut merged: Vec<Announcement> = self
            .items
            .drain(..)
            .filter(|a| self.pushed.contains(&a.id) && !fetched_ids.contains(&a.id))
            .collect();

        let mut seen_ids: HashSet<String> = merged.iter().map(|a| a.id.clone()).collect();
        for announcement in fetched {
            if self.tombstones.contains(&announcement.id) {
                continue;
            }
            if seen_ids.insert(announcement.id.clone()) {
                merged.push(announcement);
            }
        }

        // A fetch that no longer returns a deleted id has caught up with it.
        self.tombstones.retain(|id| fetched_ids.contains(id));
        self.pushed.clear();
        self.items = merged;
    }

    /// Number of announcements `user_id` has not seen.
    pub fn unseen_count(&self, user_id: &str) -> usize {
        self.items.iter().filter(|a| !a.is_seen_by(user_id)).count()
    }

    /// Marks everything seen for the user. The local update happens first so
    /// the count drops to zero at once; one store write is issued per item that
    /// was still unseen. Returns the number of writes issued.
    pub async fn mark_all_seen(&mut self, session: &Session) -> usize {
        let user_id = &session.user_id;
        let mut pending = Vec::new();
        for announcement in self.items.iter_mut() {
            if announcement.seen_by.insert(user_id.clone()) {
                pending.push(announcement.id.clone());
            }
        }

        for id in &pending {
            if let Err(e) = self.db.mark_announcement_seen(id, user_id).await {
                warn!("Failed to record announcement {} as seen: {}", id, e);
            }
        }

        if !pending.is_empty() {
            info!("Marked {} announcements seen for {}", pending.len(), user_id);
        }
        pending.len()
    }

    /// Clears one announcement for the user, refusing while it is younger
    /// than the clear lock.
    pub async fn clear_one(&mut self, session: &Session, announcement_id: &str) -> AppResult<()> {
        let now = Utc::now();
        let index = self
            .items
            .iter()
            .position(|a| a.id == announcement_id)
            .ok_or_else(|| AppError::not_found(format!("Announcement {}", announcement_id)))?;

        if !self.items[index].is_clearable(now) {
            emit(&self.notices, Notice::error("Cannot clear announcement", TOO_RECENT));
            return Err(AppError::rejected(TOO_RECENT));
        }

        let announcement = self.items.remove(index);
        let cutoff = now - Duration::days(CLEAR_LOCK_DAYS);
        match self.db.clear_announcement_for_user(announcement_id, &session.user_id, cutoff).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                self.items.insert(index, announcement);
                emit(&self.notices, Notice::error("Cannot clear announcement", TOO_RECENT));
                Err(AppError::rejected(TOO_RECENT))
            }
            Err(e) => {
                error!("Error clearing announcement {}: {}", announcement_id, e);
                Ok(())
            }
        }
    }

    /// Clears every announcement old enough to be cleared and keeps the rest.
    /// Store writes are independent: a failure part way leaves the earlier
    /// clears applied.
    pub async fn clear_all(&mut self, session: &Session) -> ClearReport {
        let now = Utc::now();
        let cutoff = now - Duration::days(CLEAR_LOCK_DAYS);

        let (eligible, kept): (Vec<Announcement>, Vec<Announcement>) =
            self.items.drain(..).partition(|a| a.is_clearable(now));
        self.items = kept;

        let mut report = ClearReport { cleared: Vec::new(), retained: self.items.len() };
        for announcement in eligible {
            match self.db.clear_announcement_for_user(&announcement.id, &session.user_id, cutoff).await {
                Ok(true) => report.cleared.push(announcement.id),
                Ok(false) => {
                    report.retained += 1;
                    self.items.push(announcement);
                }
                Err(e) => {
                    error!("Error clearing announcement {}: {}", announcement.id, e);
                    report.cleared.push(announcement.id);
                }
            }
        }
        self.items.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        if report.retained > 0 {
            emit(
                &self.notices,
                Notice::error(
                    "Cannot clear some announcements",
                    format!(
                        "{} announcement(s) were kept because they were published within {} days.",
                        report.retained, CLEAR_LOCK_DAYS
                    ),
                ),
            );
        }

        report
    }

    /// Drops all local state at logout.
    pub fn reset(&mut self) {
        self.items.clear();
        self.pushed.clear();
        self.tombstones.clear();
    }
}
