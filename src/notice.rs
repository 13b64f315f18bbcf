//! Transient success notices and their auto-clear timer.
//!
//! A notice carries a generation number. When it is shown, the controller
//! schedules a [`NoticeTimer`] that later posts
//! [`Action::NoticeExpired`](crate::store::Action::NoticeExpired) with that
//! generation; the store ignores expiries for notices that were already
//! replaced.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::store::Action;

/// A success message shown above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub generation: u64,
}

/// Cancellable one-shot timer that expires the current notice.
///
/// At most one timer is pending at a time. Scheduling a new one, calling
/// [`cancel`](Self::cancel), or dropping the timer aborts the pending task.
#[derive(Debug)]
pub struct NoticeTimer {
    sender: UnboundedSender<Action>,
    pending: Option<JoinHandle<()>>,
}

impl NoticeTimer {
    pub fn new(sender: UnboundedSender<Action>) -> Self {
        Self {
            sender,
            pending: None,
        }
    }

    /// Expire notice `generation` after `delay`, replacing any pending timer.
    pub fn schedule(&mut self, generation: u64, delay: Duration) {
        self.cancel();
        let sender = self.sender.clone();
        tracing::debug!(
            generation,
            delay_ms = delay.as_millis() as u64,
            "scheduling notice expiry"
        );
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver is gone once the session ends.
            let _ = sender.send(Action::NoticeExpired(generation));
        }));
    }

    /// Abort the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for NoticeTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
