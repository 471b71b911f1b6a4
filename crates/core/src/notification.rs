//! Transient error notification.
//!
//! At most one message is visible at a time. Raising a new message replaces the visible one and
//! restarts the hide timer, so the latest message always gets the full timeout.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A visible notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    generation: u64,
}

/// Owner of the notification slot and its hide timer.
///
/// Observers read the slot through [`Notifier::subscribe`]. Timers run on the ambient Tokio
/// runtime, so [`Notifier::raise`] must be called from within one.
#[derive(Debug)]
pub struct Notifier {
    timeout: Duration,
    generation: u64,
    tx: watch::Sender<Option<Notification>>,
    timer: Option<JoinHandle<()>>,
}

impl Notifier {
    pub fn new(timeout: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            timeout,
            generation: 0,
            tx,
            timer: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.tx.subscribe()
    }

    /// The currently visible notification, if any.
    pub fn current(&self) -> Option<Notification> {
        self.tx.borrow().clone()
    }

    /// Show `message`, replacing whatever is visible, and (re)start the hide timer.
    pub fn raise(&mut self, message: impl Into<String>) {
        self.generation += 1;
        let generation = self.generation;
        self.tx.send_replace(Some(Notification {
            message: message.into(),
            generation,
        }));

        if let Some(previous) = self.timer.take() {
            previous.abort();
        }
        let tx = self.tx.clone();
        let timeout = self.timeout;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            // A stale timer must not hide a newer message.
            tx.send_if_modified(|slot| match slot {
                Some(current) if current.generation == generation => {
                    *slot = None;
                    true
                }
                _ => false,
            });
        }));
    }

    /// Hide the visible notification immediately.
    pub fn clear(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.tx.send_if_modified(|slot| slot.take().is_some());
    }

    /// Wait until no notification is visible.
    pub async fn cleared(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(Option::is_none).await;
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
