// file: src/database/mod.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePool, Sqlite};
use std::time::Instant;

use crate::models::{
    Announcement, AppointmentRecord, CaseRecord, EventDraft, InvoiceRecord, LawyerPerformance,
    Notification, TaskRecord, UserEventRecord,
};
use crate::realtime::{AnnouncementFeed, FeedEvent, Subscription};
use crate::utils::logging;

// Declare submodules
pub mod announcements;
pub mod notifications;
pub mod performance;
pub mod records;
pub mod user_events;

/// The document store plus the push feed that mirrors its announcement
/// changes. Cloning shares both.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
    feed: AnnouncementFeed,
}

impl Database {
    pub async fn open(db_url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        let db_exists = Sqlite::database_exists(db_url)
            .await
            .context("Failed to check if database exists")?;
        if !db_exists {
            info!("Creating database");
            Sqlite::create_database(db_url)
                .await
                .context("Failed to create database")?;
        }

        let pool = SqlitePool::connect(db_url)
            .await
            .context("Failed to connect to database")?;

        run_schema(&pool).await.context("Failed to run database schema")?;

        info!("Database initialized successfully");

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Database { pool, feed: AnnouncementFeed::new() }
    }

    pub fn feed(&self) -> &AnnouncementFeed {
        &self.feed
    }

    /// Push subscription delivering only announcements visible to `user_id`.
    pub fn subscribe_announcements(&self, user_id: &str) -> Subscription {
        let user_id = user_id.to_string();
        self.feed.subscribe(move |announcement| announcement.is_visible_to(&user_id))
    }

    // --- Announcement Delegates ---

    /// Stores an announcement and pushes it to live subscribers.
    pub async fn publish_announcement(&self, announcement: &Announcement) -> Result<()> {
        let started = Instant::now();
        announcements::insert(&self.pool, announcement).await?;
        logging::log_database_operation("INSERT", "announcements", started.elapsed().as_millis() as u64);
        self.feed.publish(FeedEvent::Inserted(announcement.clone()));
        Ok(())
    }

    /// Deletes an announcement for everyone and pushes the removal.
    pub async fn retract_announcement(&self, announcement_id: &str) -> Result<bool> {
        let removed = announcements::delete(&self.pool, announcement_id).await?;
        if removed {
            self.feed.publish(FeedEvent::Deleted(announcement_id.to_string()));
        }
        Ok(removed)
    }

    pub async fn get_visible_announcements(&self, user_id: &str) -> Result<Vec<Announcement>> {
        announcements::get_visible(&self.pool, user_id).await
    }

    pub async fn mark_announcement_seen(&self, announcement_id: &str, user_id: &str) -> Result<()> {
        announcements::mark_seen(&self.pool, announcement_id, user_id).await
    }

    pub async fn clear_announcement_for_user(
        &self,
        announcement_id: &str,
        user_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<bool> {
        announcements::clear_for_user(&self.pool, announcement_id, user_id, cutoff).await
    }

    // --- Notification Delegates ---

    pub async fn add_notification(&self, notification: &Notification) -> Result<()> {
        notifications::insert(&self.pool, notification).await
    }

    pub async fn get_notifications(&self, user_id: &str) -> Result<Vec<Notification>> {
        notifications::get_for_user(&self.pool, user_id).await
    }

    pub async fn mark_notification_seen(&self, notification_id: &str) -> Result<()> {
        notifications::mark_seen(&self.pool, notification_id).await
    }

    pub async fn delete_notification(&self, notification_id: &str) -> Result<()> {
        notifications::delete(&self.pool, notification_id).await
    }

    pub async fn delete_all_notifications(&self, user_id: &str) -> Result<u64> {
        notifications::delete_all_for_user(&self.pool, user_id).await
    }

    // --- Calendar Source Delegates ---

    pub async fn get_tasks_for_lawyer(&self, lawyer_id: &str) -> Result<Vec<TaskRecord>> {
        records::get_tasks_for_lawyer(&self.pool, lawyer_id).await
    }

    pub async fn get_pending_tasks(&self) -> Result<Vec<TaskRecord>> {
        records::get_pending_tasks(&self.pool).await
    }

    pub async fn get_running_cases(&self, lawyer_id: Option<&str>) -> Result<Vec<CaseRecord>> {
        records::get_running_cases(&self.pool, lawyer_id).await
    }

    pub async fn get_pending_appointments(&self, lawyer_id: Option<&str>) -> Result<Vec<AppointmentRecord>> {
        records::get_pending_appointments(&self.pool, lawyer_id).await
    }

    pub async fn get_pending_invoices(&self) -> Result<Vec<InvoiceRecord>> {
        records::get_pending_invoices(&self.pool).await
    }

    pub async fn save_task(&self, task: &TaskRecord) -> Result<()> {
        records::upsert_task(&self.pool, task).await
    }

    pub async fn save_case(&self, case: &CaseRecord) -> Result<()> {
        records::upsert_case(&self.pool, case).await
    }

    pub async fn save_appointment(&self, appointment: &AppointmentRecord) -> Result<()> {
        records::upsert_appointment(&self.pool, appointment).await
    }

    pub async fn save_invoice(&self, invoice: &InvoiceRecord) -> Result<()> {
        records::upsert_invoice(&self.pool, invoice).await
    }

    pub async fn get_user_events(&self, user_id: &str) -> Result<Vec<UserEventRecord>> {
        user_events::get_for_user(&self.pool, user_id).await
    }

    pub async fn add_user_event(&self, user_id: &str, draft: &EventDraft) -> Result<UserEventRecord> {
        user_events::insert(&self.pool, user_id, draft).await
    }

    // --- Performance Delegates ---

    pub async fn add_lawyer(&self, id: &str, name: &str, email: Option<&str>) -> Result<()> {
        performance::add_lawyer(&self.pool, id, name, email).await
    }

    pub async fn get_lawyer_performance(&self) -> Result<Vec<LawyerPerformance>> {
        performance::get_all(&self.pool).await
    }
}

async fn run_schema(pool: &SqlitePool) -> Result<()> {
    let schema = include_str!("schema.sql");

    let mut current_statement = String::new();

    for line in schema.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") || trimmed.is_empty() {
            continue;
        }

        current_statement.push_str(line);
        current_statement.push('\n');

        if trimmed.ends_with(';') {
            sqlx::query(&current_statement).execute(pool).await?;
            current_statement.clear();
        }
    }
    Ok(())
}
