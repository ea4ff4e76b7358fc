// Lexboard library
// Dashboard core for a law-firm practice: announcements, notifications and
// the role-scoped calendar with Google Calendar mirroring.

pub mod auth;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod error;
pub mod http_config;
pub mod models;
pub mod realtime;
pub mod reconciler;
pub mod utils;

// Re-export commonly used types
pub use models::*;
pub use database::Database;
pub use dashboard::Dashboard;
pub use error::{AppError, AppResult};
pub use realtime::{AnnouncementFeed, FeedEvent, Subscription};
