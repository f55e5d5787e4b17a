//! Notification service
//!
//! Thin handle around the outbox queue. The state machine enqueues
//! jobs here after persisting a transition; the worker consumes them.
//! Enqueueing never blocks and never fails the caller: that is the
//! whole point of the outbox.

use shared::models::OrderStatus;
use tokio::sync::mpsc;

/// One transition's worth of notification work
#[derive(Debug, Clone)]
pub struct NotificationJob {
    pub order_id: String,
    pub previous: OrderStatus,
    /// Transition target the notification describes
    pub status: OrderStatus,
}

/// Sender half of the notification outbox
#[derive(Clone)]
pub struct NotificationService {
    tx: mpsc::Sender<NotificationJob>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Create the service and the receiver the worker will consume
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<NotificationJob>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (Self { tx }, rx)
    }

    /// Fire-and-forget enqueue
    ///
    /// A full or closed queue drops the job with a warning; order state
    /// is already persisted and must not be affected by notification
    /// backpressure.
    pub fn enqueue(&self, job: NotificationJob) {
        if let Err(e) = self.tx.try_send(job) {
            tracing::warn!(error = %e, "Notification queue unavailable, dropping job");
        }
    }
}
