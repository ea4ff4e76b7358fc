// file: src/models/notice.rs
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::error::TrySendError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeStatus {
    Success,
    Error,
    Info,
    Warning,
}

/// A short user-visible message, shown by the front end and then discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: Option<String>,
    pub status: NoticeStatus,
}

impl Notice {
    pub fn new(status: NoticeStatus, title: impl Into<String>, description: Option<String>) -> Self {
        Self { title: title.into(), description, status }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeStatus::Success, title, Some(description.into()))
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeStatus::Error, title, Some(description.into()))
    }

    pub fn info(title: impl Into<String>, description: Option<String>) -> Self {
        Self::new(NoticeStatus::Info, title, description)
    }
}

pub type NoticeSender = tokio::sync::mpsc::Sender<Notice>;

/// Delivers a notice if anyone is listening. Never waits: a full queue or a
/// closed view drops the notice, so the caller's work always continues.
pub fn emit(sender: &Option<NoticeSender>, notice: Notice) {
    let Some(tx) = sender else {
        return;
    };
    match tx.try_send(notice) {
        Ok(()) => {}
        Err(TrySendError::Full(notice)) => {
            log::debug!("Notice queue full, dropping '{}'", notice.title)
        }
        Err(TrySendError::Closed(_)) => log::debug!("Notice receiver dropped"),
    }
}
