// Declare modules
pub mod announcement;
pub mod calendar_event;
pub mod notice;
pub mod notification;
pub mod performance;
pub mod records;
pub mod session;

// Re-export all public types so callers can `use crate::models::Announcement`.
pub use announcement::{Announcement, Priority};
pub use calendar_event::{CalendarEvent, EventColor, EventDraft};
pub use notice::{Notice, NoticeSender, NoticeStatus};
pub use notification::{Notification, NotificationKind};
pub use performance::{LawyerPerformance, PerformancePage};
pub use records::{
    AppointmentRecord, CaseRecord, InvoiceRecord, LawyerRef, TaskRecord, UserEventRecord,
};
pub use session::{Role, Session};
