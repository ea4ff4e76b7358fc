// file: src/models/calendar_event.rs
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Colour tag the calendar view uses to tell source kinds apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    Red,
    Blue,
    Green,
    Purple,
    Orange,
}

impl EventColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventColor::Red => "red",
            EventColor::Blue => "blue",
            EventColor::Green => "green",
            EventColor::Purple => "purple",
            EventColor::Orange => "orange",
        }
    }
}

/// Normalized calendar entry. Rebuilt on every aggregation, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    /// ISO date or date-time exactly as the source record holds it.
    pub start: String,
    pub resource_id: String,
    pub color: EventColor,
    pub url: String,
    pub lawyer_id: Option<String>,
    pub lawyer_name: Option<String>,
}

impl CalendarEvent {
    pub fn start_time(&self, tz: Tz) -> Option<DateTime<Utc>> {
        crate::utils::parse_event_start(&self.start, tz)
    }

    /// One-hour slot anchored at `start`.
    pub fn window(&self, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.start_time(tz).map(|start| (start, start + Duration::hours(1)))
    }
}

/// User input for an ad-hoc event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub start: String,
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_window_is_one_hour() {
        let (start, end) = event("2025-01-10T09:30:00Z").window(chrono_tz::UTC).unwrap();
        assert_eq!((end - start).num_minutes(), 60);
        assert_eq!(start.to_rfc3339(), "2025-01-10T09:30:00+00:00");
    }

    #[test]
    fn test_window_rejects_garbage() {
        assert!(event("next tuesday").window(chrono_tz::UTC).is_none());
    }

    #[test]
    fn test_color_names() {
        assert_eq!(EventColor::Orange.as_str(), "orange");
        assert_eq!(serde_json::to_string(&EventColor::Purple).unwrap(), "\"purple\"");
    }
}
