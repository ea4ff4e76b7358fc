// file: src/models/notification.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a notification points at. The target id lives inside the variant so a
/// notification always carries exactly one of case, task or appointment id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Case { case_id: String, case_no: Option<String> },
    Task { task_id: String, task_name: Option<String> },
    Appointment { appointment_id: String, appointment_name: Option<String> },
}

impl NotificationKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NotificationKind::Case { .. } => "CASE",
            NotificationKind::Task { .. } => "TASK",
            NotificationKind::Appointment { .. } => "APPOINTMENT",
        }
    }

    pub fn target_id(&self) -> &str {
        match self {
            NotificationKind::Case { case_id, .. } => case_id,
            NotificationKind::Task { task_id, .. } => task_id,
            NotificationKind::Appointment { appointment_id, .. } => appointment_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub notification_name: String,
    pub kind: NotificationKind,
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            notification_name: name.into(),
            kind,
            seen: false,
            created_at: Utc::now(),
        }
    }

    /// Deep link into the dashboard, e.g. `/task/42`.
    pub fn route(&self) -> String {
        format!("/{}/{}", self.kind.type_name().to_lowercase(), self.kind.target_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_uses_lowercase_type() {
        let notification = Notification::new(
            "u1",
            "Hearing moved",
            NotificationKind::Case { case_id: "c-9".to_string(), case_no: Some("CS/12/2024".to_string()) },
        );
        assert_eq!(notification.route(), "/case/c-9");

        let appointment = Notification::new(
            "u1",
            "Client meeting",
            NotificationKind::Appointment { appointment_id: "a-1".to_string(), appointment_name: None },
        );
        assert_eq!(appointment.route(), "/appointment/a-1");
        assert!(!appointment.seen);
    }
}
