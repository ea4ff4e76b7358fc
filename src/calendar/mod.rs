// Calendar module
// Builds the role-scoped dashboard calendar and mirrors it into Google Calendar.

use log::{error, info, warn};

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::notice::{emit, NoticeSender};
use crate::models::{CalendarEvent, EventDraft, Notice, Session};

pub mod aggregate;
pub mod google;
pub mod sync;

pub use aggregate::{aggregate, CalendarScope};
pub use google::GoogleCalendarClient;
pub use sync::{
    AuthorizationPrompt, AuthorizationRequest, CalendarSync, ChannelPrompt, SyncReport, TokenStore,
};

/// The signed-in user's calendar view. Its notice channel also carries the
/// per-event results of every mirror it triggers.
pub struct CalendarBoard {
    db: Database,
    sync: CalendarSync,
    events: Vec<CalendarEvent>,
    notices: Option<NoticeSender>,
}

impl CalendarBoard {
    pub fn new(db: Database, mut sync: CalendarSync, notices: Option<NoticeSender>) -> Self {
        if notices.is_some() {
            sync.set_notices(notices.clone());
        }
        Self { db, sync, events: Vec::new(), notices }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn sync(&self) -> &CalendarSync {
        &self.sync
    }

    /// Rebuilds the aggregate. When calendar access was already granted the
    /// whole set is mirrored; otherwise no prompt is raised from here.
    pub async fn refresh(&mut self, session: &Session) -> usize {
        self.events = aggregate(&self.db, session).await;
        info!("Calendar aggregated {} events for {}", self.events.len(), session.user_id);

        if self.sync.tokens().is_authorized().await {
            if let Err(e) = self.sync.sync_to_external_calendar(&self.events).await {
                warn!("Calendar mirror skipped: {}", e);
            }
        }

        self.events.len()
    }

    /// Explicit "add to Google Calendar" for the current aggregate.
    pub async fn sync_all(&self) -> AppResult<SyncReport> {
        self.sync.sync_to_external_calendar(&self.events).await
    }

    pub async fn create_event(&mut self, session: &Session, draft: EventDraft) -> AppResult<CalendarEvent> {
        if draft.title.trim().is_empty() {
            return Err(AppError::invalid_input("Event title is required"));
        }
        if draft.start.trim().is_empty() {
            return Err(AppError::invalid_input("Event start is required"));
        }

        let record = self.db.add_user_event(&session.user_id, &draft).await.map_err(|e| {
            error!("Failed to store event for {}: {:#}", session.user_id, e);
            AppError::write_failed("Could not save the event")
        })?;

        let event = aggregate::user_event(record);
        self.events.push(event.clone());

        match self.sync.sync_to_external_calendar(std::slice::from_ref(&event)).await {
            Ok(report) if !report.failed.is_empty() => {
                warn!("New event {} was not mirrored", event.resource_id)
            }
            Ok(_) => {}
            Err(e) => warn!("New event {} not mirrored: {}", event.resource_id, e),
        }

        emit(
            &self.notices,
            Notice::success("Event Created", format!("'{}' was added to your calendar.", event.title)),
        );

        Ok(event)
    }

    pub fn reset(&mut self) {
        self.events.clear();
    }
}
