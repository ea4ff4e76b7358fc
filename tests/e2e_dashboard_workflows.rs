use chrono::{Duration, Utc};
use lexboard::calendar::{AuthorizationPrompt, CalendarSync, GoogleCalendarClient, TokenStore};
use lexboard::{
    Announcement, AppError, AppResult, Dashboard, Database, Notification, NotificationKind,
    Priority, Role, Session, TaskRecord,
};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::time::timeout;

struct NoPrompt;

impl AuthorizationPrompt for NoPrompt {
    fn request_authorization(&self) -> AppResult<()> {
        Err(AppError::config("GOOGLE_CLIENT_ID is not configured"))
    }
}

async fn create_test_database() -> Database {
    let temp_file = NamedTempFile::new().unwrap();
    let (_, path) = temp_file.keep().unwrap();
    let db_path = format!("sqlite:{}", path.to_str().unwrap());

    Database::open(&db_path).await.unwrap()
}

fn offline_sync() -> CalendarSync {
    let client = GoogleCalendarClient::with_client(
        reqwest::Client::new(),
        "http://127.0.0.1:9",
        "primary",
        chrono_tz::Asia::Kolkata,
    );
    CalendarSync::new(client, TokenStore::new(), Arc::new(NoPrompt), None)
}

async fn seed(db: &Database) {
    let mut old = Announcement::new("Annual dinner", Some("Friday 7pm".to_string()), Priority::Low);
    old.published_at = Utc::now() - Duration::days(45);
    db.publish_announcement(&old).await.unwrap();
    db.publish_announcement(&Announcement::new("New filing rules", None, Priority::High))
        .await
        .unwrap();

    db.add_notification(&Notification::new(
        "u1",
        "Task assigned",
        NotificationKind::Task { task_id: "t1".to_string(), task_name: Some("Draft reply".to_string()) },
    ))
    .await
    .unwrap();

    db.save_task(&TaskRecord {
        id: "t1".to_string(),
        task_name: "Draft reply".to_string(),
        task_status: "PENDING".to_string(),
        end_date: "2025-01-10".to_string(),
        lawyer: None,
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_dashboard_session_lifecycle() {
    let db = create_test_database().await;
    seed(&db).await;

    let session = Session::new("u1", "Asha", Role::Admin);
    let mut dashboard = Dashboard::start(db.clone(), offline_sync(), session, None).await;

    assert!(dashboard.is_live());
    assert_eq!(dashboard.announcements.items().len(), 2);
    assert_eq!(dashboard.notifications.unseen_count(), 1);
    assert_eq!(dashboard.calendar.events().len(), 1);
    assert_eq!(dashboard.unseen_total(), 3);

    // Live update while signed in.
    db.publish_announcement(&Announcement::new("Server maintenance", None, Priority::Medium))
        .await
        .unwrap();
    let applied = timeout(std::time::Duration::from_secs(2), dashboard.next_update())
        .await
        .unwrap();
    assert_eq!(applied, Some(true));
    assert_eq!(dashboard.announcements.items()[0].title, "Server maintenance");

    let report = dashboard.performance_report(1).await.unwrap();
    assert_eq!(report.total_pages, 1);

    dashboard.shutdown().await;
    assert!(!dashboard.is_live());
    assert!(dashboard.announcements.items().is_empty());
    assert!(dashboard.calendar.events().is_empty());
    assert!(!dashboard.calendar.sync().tokens().is_authorized().await);

    db.publish_announcement(&Announcement::new("After logout", None, Priority::Low))
        .await
        .unwrap();
    assert_eq!(dashboard.next_update().await, None);
    assert_eq!(dashboard.apply_pending().await, 0);
}

#[tokio::test]
async fn test_targeted_push_skips_other_users() {
    let db = create_test_database().await;
    let session = Session::new("u1", "Asha", Role::FieldWorker);
    let mut dashboard = Dashboard::start(db.clone(), offline_sync(), session, None).await;

    db.publish_announcement(&Announcement::new("For u2", None, Priority::Low).for_user("u2"))
        .await
        .unwrap();
    db.publish_announcement(&Announcement::new("For u1", None, Priority::Low).for_user("u1"))
        .await
        .unwrap();

    let applied = timeout(std::time::Duration::from_secs(2), dashboard.next_update())
        .await
        .unwrap();
    assert_eq!(applied, Some(true));
    assert_eq!(dashboard.announcements.items().len(), 1);
    assert_eq!(dashboard.announcements.items()[0].title, "For u1");
}

#[tokio::test]
async fn test_report_requires_admin() {
    let db = create_test_database().await;
    let session = Session::new("u1", "Asha", Role::FieldWorker);
    let dashboard = Dashboard::start(db, offline_sync(), session, None).await;

    let result = dashboard.performance_report(1).await;
    assert!(matches!(result, Err(AppError::PermissionDenied(_))));
}
