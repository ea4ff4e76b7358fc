// file: src/models/announcement.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::CLEAR_LOCK_DAYS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Unknown priority: {}", value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub message: Option<String>,
    pub published_at: DateTime<Utc>,
    pub priority: Priority,
    /// Only this user may see the announcement. `None` means everyone.
    pub meant_for: Option<String>,
    pub seen_by: BTreeSet<String>,
}

impl Announcement {
    pub fn new(title: impl Into<String>, message: Option<String>, priority: Priority) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            message,
            published_at: Utc::now(),
            priority,
            meant_for: None,
            seen_by: BTreeSet::new(),
        }
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.meant_for = Some(user_id.into());
        self
    }

    pub fn is_visible_to(&self, user_id: &str) -> bool {
        match &self.meant_for {
            Some(target) => target == user_id,
            None => true,
        }
    }

    pub fn is_seen_by(&self, user_id: &str) -> bool {
        self.seen_by.contains(user_id)
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.published_at
    }

    pub fn is_clearable(&self, now: DateTime<Utc>) -> bool {
        self.age(now) >= Duration::days(CLEAR_LOCK_DAYS)
    }
}
