//! Push channel for announcement changes.
//!
//! The store publishes every insert and delete on a broadcast channel. Each
//! subscriber gets its own forwarding task that applies the subscriber's
//! filter and hands events over an mpsc queue, so consumers read updates as
//! messages instead of registering callbacks.

use crate::models::Announcement;
use log::{debug, info, warn};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

const FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Inserted(Announcement),
    Deleted(String),
}

#[derive(Debug, Clone)]
pub struct AnnouncementFeed {
    sender: broadcast::Sender<FeedEvent>,
}

impl Default for AnnouncementFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnouncementFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: FeedEvent) {
        // No receivers is fine: nobody is signed in.
        if self.sender.send(event).is_err() {
            debug!("Announcement feed has no subscribers");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Opens a subscription. `filter` decides which inserts are delivered;
    /// deletes are always delivered because the consumer may hold the item.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe<F>(&self, filter: F) -> Subscription
    where
        F: Fn(&Announcement) -> bool + Send + 'static,
    {
        let mut upstream = self.sender.subscribe();
        let (tx, rx) = mpsc::channel(FEED_CAPACITY);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            loop {
                let received = tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    received = upstream.recv() => received,
                };

                let event = match received {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Announcement subscriber lagged, {} updates dropped", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                let deliver = match &event {
                    FeedEvent::Inserted(announcement) => filter(announcement),
                    FeedEvent::Deleted(_) => true,
                };

                if deliver && tx.send(event).await.is_err() {
                    break;
                }
            }
            debug!("Announcement subscription forwarder stopped");
        });

        Subscription { receiver: rx, cancel }
    }
}

/// Live announcement updates for one consumer.
///
/// Once released (via [`Subscription::cancel`] or drop) no further events
/// are yielded, even ones already queued.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::Receiver<FeedEvent>,
    cancel: CancellationToken,
}

impl Subscription {
    /// Waits for the next update. `None` once the subscription is released
    /// or the feed is gone.
    pub async fn next(&mut self) -> Option<FeedEvent> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            event = self.receiver.recv() => event,
        }
    }

    /// Returns an update if one is already queued.
    pub fn try_next(&mut self) -> Option<FeedEvent> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.receiver.try_recv().ok()
    }

    pub fn cancel(&mut self) {
        if !self.cancel.is_cancelled() {
            info!("Releasing announcement subscription");
            self.cancel.cancel();
            self.receiver.close();
        }
    }

    pub fn is_released(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
