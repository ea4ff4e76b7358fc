// Google Calendar REST client
// Inserts events into one configured calendar with a caller-supplied bearer token.

use chrono_tz::Tz;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::http_config::HttpConfig;
use crate::models::CalendarEvent;
use crate::utils::to_api_timestamp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoogleEventTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertEventRequest {
    pub summary: String,
    pub start: GoogleEventTime,
    pub end: GoogleEventTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertedEvent {
    pub id: Option<String>,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http: Client,
    base_url: String,
    calendar_id: String,
    time_zone: Tz,
}

impl GoogleCalendarClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = HttpConfig::calendar_api().build_client()?;
        Ok(Self::with_client(
            http,
            &config.calendar_api_base,
            &config.calendar_id,
            config.time_zone,
        ))
    }

    pub fn with_client(http: Client, base_url: &str, calendar_id: &str, time_zone: Tz) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            calendar_id: calendar_id.to_string(),
            time_zone,
        }
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    pub fn events_url(&self) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::config(format!("Invalid calendar API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::config("Calendar API URL cannot be a base"))?
            .push("calendars")
            .push(&self.calendar_id)
            .push("events");
        Ok(url)
    }

    /// Request body for one event: a one-hour slot from its start.
    pub fn build_request(&self, event: &CalendarEvent) -> AppResult<InsertEventRequest> {
        let (start, end) = event.window(self.time_zone).ok_or_else(|| {
            AppError::invalid_input(format!(
                "Event {} has an unreadable start '{}'",
                event.resource_id, event.start
            ))
        })?;
        let time_zone = self.time_zone.name().to_string();

        Ok(InsertEventRequest {
            summary: event.title.clone(),
            start: GoogleEventTime { date_time: to_api_timestamp(start), time_zone: time_zone.clone() },
            end: GoogleEventTime { date_time: to_api_timestamp(end), time_zone },
        })
    }

    pub async fn insert_event(&self, access_token: &str, event: &CalendarEvent) -> AppResult<InsertedEvent> {
        let body = self.build_request(event)?;
        let url = self.events_url()?;

        let response = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::write_failed(format!(
                "Calendar insert for '{}' failed: {}",
                event.title, status
            )));
        }

        let inserted: InsertedEvent = response.json().await?;
        debug!("Google Calendar event created: {:?}", inserted.html_link);
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventColor;

    fn client(calendar_id: &str) -> GoogleCalendarClient {
        GoogleCalendarClient::with_client(
            Client::new(),
            "https://www.googleapis.com/calendar/v3/",
            calendar_id,
            chrono_tz::Asia::Kolkata,
        )
    }

    fn event(start: &str) -> CalendarEvent {
        CalendarEvent {
            title: "Next Hearing".to_string(),
            start: start.to_string(),
            resource_id: "c1".to_string(),
            color: EventColor::Green,
            url: "/case/c1".to_string(),
            lawyer_id: None,
            lawyer_name: None,
        }
    }

    #[test]
    fn test_events_url_escapes_calendar_id() {
        let url = client("office@firm.in").events_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/office@firm.in/events"
        );
        let url = client("team calendar").events_url().unwrap();
        assert!(url.as_str().ends_with("/calendars/team%20calendar/events"));
    }

    #[test]
    fn test_build_request_body() {
        let body = client("primary").build_request(&event("2025-01-10T10:00:00Z")).unwrap();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["summary"], "Next Hearing");
        assert_eq!(json["start"]["dateTime"], "2025-01-10T10:00:00.000Z");
        assert_eq!(json["end"]["dateTime"], "2025-01-10T11:00:00.000Z");
        assert_eq!(json["end"]["timeZone"], "Asia/Kolkata");
    }

    #[test]
    fn test_build_request_rejects_bad_start() {
        let result = client("primary").build_request(&event("soon"));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
