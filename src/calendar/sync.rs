// Mirroring of dashboard events into Google Calendar.

use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, RwLock};
use url::Url;

use super::google::GoogleCalendarClient;
use crate::config::{Config, CALENDAR_SCOPE};
use crate::error::{AppError, AppResult};
use crate::models::notice::{emit, NoticeSender};
use crate::models::{CalendarEvent, Notice};
use crate::utils::logging;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Starts the interactive OAuth consent flow. Completion is reported back
/// through [`CalendarSync::complete_authorization`].
#[cfg_attr(test, mockall::automock)]
pub trait AuthorizationPrompt: Send + Sync {
    fn request_authorization(&self) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub consent_url: String,
}

/// Hands the consent URL to the front end over a channel.
pub struct ChannelPrompt {
    /// `None` when no OAuth client is configured.
    consent_url: Option<String>,
    sender: mpsc::UnboundedSender<AuthorizationRequest>,
}

impl ChannelPrompt {
    pub fn new(config: &Config, sender: mpsc::UnboundedSender<AuthorizationRequest>) -> Self {
        let consent_url = match consent_url(config) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Google Calendar authorization unavailable: {}", e);
                None
            }
        };
        Self { consent_url, sender }
    }
}

impl AuthorizationPrompt for ChannelPrompt {
    fn request_authorization(&self) -> AppResult<()> {
        let consent_url = self
            .consent_url
            .clone()
            .ok_or_else(|| AppError::config("GOOGLE_CLIENT_ID is not configured"))?;
        self.sender
            .send(AuthorizationRequest { consent_url })
            .map_err(|_| AppError::auth("Authorization prompt is no longer listening"))
    }
}

/// Google consent URL for the implicit (token) flow with calendar scope.
pub fn consent_url(config: &Config) -> AppResult<String> {
    let client_id = config
        .google_client_id
        .as_deref()
        .ok_or_else(|| AppError::config("GOOGLE_CLIENT_ID is not configured"))?;

    let url = Url::parse_with_params(
        GOOGLE_AUTH_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", config.oauth_redirect_uri.as_str()),
            ("response_type", "token"),
            ("scope", CALENDAR_SCOPE),
            ("include_granted_scopes", "true"),
        ],
    )
    .map_err(|e| AppError::config(format!("Invalid auth URL: {}", e)))?;

    Ok(url.to_string())
}

/// OAuth access token held for the session. Expiry is not tracked; a
/// rejected insert is the only signal.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, token: String) {
        *self.inner.write().await = Some(token);
    }

    pub async fn get(&self) -> Option<String> {
        self.inner.read().await.clone()
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    pub async fn is_authorized(&self) -> bool {
        self.inner.read().await.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Resource ids that reached the calendar.
    pub synced: Vec<String>,
    /// Resource id and reason for each event that did not.
    pub failed: Vec<(String, String)>,
}

pub struct CalendarSync {
    client: GoogleCalendarClient,
    tokens: TokenStore,
    prompt: Arc<dyn AuthorizationPrompt>,
    notices: Option<NoticeSender>,
}

impl CalendarSync {
    pub fn new(
        client: GoogleCalendarClient,
        tokens: TokenStore,
        prompt: Arc<dyn AuthorizationPrompt>,
        notices: Option<NoticeSender>,
    ) -> Self {
        Self { client, tokens, prompt, notices }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub(crate) fn set_notices(&mut self, notices: Option<NoticeSender>) {
        self.notices = notices;
    }

    pub async fn complete_authorization(&self, access_token: String) {
        logging::log_auth_event("Google Calendar authorization completed", self.client.calendar_id());
        self.tokens.set(access_token).await;
    }

    /// Inserts each event as a one-hour calendar entry.
    ///
    /// Without a token this opens the consent prompt and returns
    /// `AuthRequired`; nothing is queued, so the caller retries once
    /// authorization completes. Inserts are independent of each other.
    pub async fn sync_to_external_calendar(&self, events: &[CalendarEvent]) -> AppResult<SyncReport> {
        let Some(token) = self.tokens.get().await else {
            info!("No calendar token, requesting authorization");
            self.prompt.request_authorization()?;
            return Err(AppError::auth_required("Google Calendar access has not been granted"));
        };

        let started = Instant::now();
        let mut report = SyncReport::default();

        for event in events {
            match self.client.insert_event(&token, event).await {
                Ok(_) => report.synced.push(event.resource_id.clone()),
                Err(e) => {
                    warn!("Error adding event {} to Google Calendar: {}", event.resource_id, e);
                    emit(
                        &self.notices,
                        Notice::error(
                            "Google Calendar Error",
                            format!("Failed to add '{}' to Google Calendar.", event.title),
                        ),
                    );
                    report.failed.push((event.resource_id.clone(), e.to_safe_string()));
                }
            }
        }

        logging::log_calendar_sync(
            self.client.calendar_id(),
            report.synced.len(),
            report.failed.len(),
            started.elapsed().as_millis() as u64,
        );

        if !report.synced.is_empty() {
            emit(
                &self.notices,
                Notice::success(
                    "Events Added to Google Calendar",
                    format!("{} event(s) were added to your Google Calendar.", report.synced.len()),
                ),
            );
        }

        Ok(report)
    }
}
