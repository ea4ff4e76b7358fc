use lexboard::calendar::{
    AuthorizationPrompt, CalendarBoard, CalendarSync, GoogleCalendarClient, TokenStore,
};
use lexboard::{AppError, AppResult, CalendarEvent, Database, EventColor, EventDraft, Role, Session};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct CountingPrompt {
    calls: AtomicUsize,
}

impl AuthorizationPrompt for CountingPrompt {
    fn request_authorization(&self) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn client(server: &MockServer) -> GoogleCalendarClient {
    GoogleCalendarClient::with_client(reqwest::Client::new(), &server.uri(), "primary", chrono_tz::Asia::Kolkata)
}

fn event(id: &str, title: &str, start: &str) -> CalendarEvent {
    CalendarEvent {
        title: title.to_string(),
        start: start.to_string(),
        resource_id: id.to_string(),
        color: EventColor::Green,
        url: format!("/case/{}", id),
        lawyer_id: None,
        lawyer_name: None,
    }
}

async fn create_test_database() -> Database {
    let temp_file = NamedTempFile::new().unwrap();
    let (_, path) = temp_file.keep().unwrap();
    Database::open(&format!("sqlite:{}", path.to_str().unwrap())).await.unwrap()
}

#[tokio::test]
async fn test_sync_sends_one_hour_slots_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .and(header("Authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "summary": "Next Hearing",
            "start": { "dateTime": "2025-01-15T00:00:00.000Z", "timeZone": "Asia/Kolkata" },
            "end": { "dateTime": "2025-01-15T01:00:00.000Z", "timeZone": "Asia/Kolkata" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "g1",
            "htmlLink": "https://calendar.google.com/event?eid=g1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let prompt = Arc::new(CountingPrompt::default());
    let sync = CalendarSync::new(client(&server), TokenStore::new(), prompt.clone(), None);
    sync.complete_authorization("test-token".to_string()).await;

    let report = sync
        .sync_to_external_calendar(&[event("c1", "Next Hearing", "2025-01-15")])
        .await
        .unwrap();

    assert_eq!(report.synced, vec!["c1".to_string()]);
    assert!(report.failed.is_empty());
    assert_eq!(prompt.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_one_failed_insert_does_not_stop_the_rest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "summary": "Rejected" })))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "summary": "Accepted" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "ok" })))
        .expect(2)
        .mount(&server)
        .await;

    let (tx, mut rx) = tokio::sync::mpsc::channel(8);
    let sync = CalendarSync::new(
        client(&server),
        TokenStore::new(),
        Arc::new(CountingPrompt::default()),
        Some(tx),
    );
    sync.complete_authorization("test-token".to_string()).await;

    let events = vec![
        event("e1", "Accepted", "2025-01-10"),
        event("e2", "Rejected", "2025-01-11"),
        event("e3", "Accepted", "2025-01-12T15:00:00+05:30"),
    ];
    let report = sync.sync_to_external_calendar(&events).await.unwrap();

    assert_eq!(report.synced, vec!["e1".to_string(), "e3".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "e2");

    assert_eq!(rx.recv().await.unwrap().title, "Google Calendar Error");
    assert_eq!(rx.recv().await.unwrap().title, "Events Added to Google Calendar");
}

#[tokio::test]
async fn test_unreadable_start_is_reported_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let sync = CalendarSync::new(client(&server), TokenStore::new(), Arc::new(CountingPrompt::default()), None);
    sync.complete_authorization("test-token".to_string()).await;

    let report = sync.sync_to_external_calendar(&[event("e1", "Sometime", "next week")]).await.unwrap();
    assert!(report.synced.is_empty());
    assert_eq!(report.failed.len(), 1);
}

#[tokio::test]
async fn test_missing_token_prompts_and_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let prompt = Arc::new(CountingPrompt::default());
    let sync = CalendarSync::new(client(&server), TokenStore::new(), prompt.clone(), None);

    let result = sync.sync_to_external_calendar(&[event("c1", "Next Hearing", "2025-01-15")]).await;
    assert!(matches!(result, Err(AppError::AuthRequired(_))));
    assert_eq!(prompt.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_create_event_mirrors_single_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/calendars/primary/events"))
        .and(body_partial_json(json!({ "summary": "Client call" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "g9" })))
        .expect(1)
        .mount(&server)
        .await;

    let db = create_test_database().await;
    let sync = CalendarSync::new(client(&server), TokenStore::new(), Arc::new(CountingPrompt::default()), None);
    sync.complete_authorization("test-token".to_string()).await;

    let (tx, mut rx) = tokio::sync::mpsc::channel(8);
    let mut board = CalendarBoard::new(db.clone(), sync, Some(tx));
    let session = Session::new("u1", "Asha", Role::FieldWorker);

    let draft = EventDraft { title: "Client call".to_string(), start: "2025-02-01T09:00:00".to_string() };
    let created = board.create_event(&session, draft).await.unwrap();

    assert_eq!(created.color, EventColor::Orange);
    assert_eq!(board.events().len(), 1);
    assert_eq!(db.get_user_events("u1").await.unwrap().len(), 1);

    assert_eq!(rx.recv().await.unwrap().title, "Events Added to Google Calendar");
    assert_eq!(rx.recv().await.unwrap().title, "Event Created");
}

#[tokio::test]
async fn test_create_event_survives_calendar_outage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let db = create_test_database().await;
    let sync = CalendarSync::new(client(&server), TokenStore::new(), Arc::new(CountingPrompt::default()), None);
    sync.complete_authorization("test-token".to_string()).await;
    let mut board = CalendarBoard::new(db, sync, None);
    let session = Session::new("u1", "Asha", Role::FieldWorker);

    let draft = EventDraft { title: "Site visit".to_string(), start: "2025-02-03".to_string() };
    assert!(board.create_event(&session, draft).await.is_ok());
    assert_eq!(board.events().len(), 1);
}

#[tokio::test]
async fn test_full_notice_queue_does_not_stall_sync() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    // Nobody reads the queue while the sync runs.
    let (tx, mut rx) = tokio::sync::mpsc::channel(2);
    let sync = CalendarSync::new(client(&server), TokenStore::new(), Arc::new(CountingPrompt::default()), Some(tx));
    sync.complete_authorization("test-token".to_string()).await;

    let events: Vec<CalendarEvent> = (0..10)
        .map(|index| event(&format!("e{}", index), "Undated", "whenever"))
        .collect();
    let report = tokio::time::timeout(std::time::Duration::from_secs(3), sync.sync_to_external_calendar(&events))
        .await
        .expect("sync blocked on the notice queue")
        .unwrap();

    assert_eq!(report.failed.len(), 10);
    assert_eq!(rx.recv().await.unwrap().title, "Google Calendar Error");
    assert_eq!(rx.recv().await.unwrap().title, "Google Calendar Error");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_board_reports_failed_mirror_on_its_channel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let db = create_test_database().await;
    let sync = CalendarSync::new(client(&server), TokenStore::new(), Arc::new(CountingPrompt::default()), None);
    sync.complete_authorization("test-token".to_string()).await;

    let (tx, mut rx) = tokio::sync::mpsc::channel(8);
    let mut board = CalendarBoard::new(db, sync, Some(tx));
    let session = Session::new("u1", "Asha", Role::FieldWorker);

    let draft = EventDraft { title: "Bail hearing prep".to_string(), start: "2025-02-04".to_string() };
    board.create_event(&session, draft).await.unwrap();

    assert_eq!(rx.recv().await.unwrap().title, "Google Calendar Error");
    assert_eq!(rx.recv().await.unwrap().title, "Event Created");
}
