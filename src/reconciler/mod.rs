// Local announcement and notification state for one signed-in user.
//
// Both reconcilers own their collection and are driven from a single task;
// remote writes are awaited in place but their failures only get logged.

pub mod announcements;
pub mod notifications;

pub use announcements::{AnnouncementReconciler, ClearReport};
pub use notifications::NotificationReconciler;
