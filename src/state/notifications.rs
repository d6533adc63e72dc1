//! Toast queue and real-time connection health.
//!
//! DESIGN
//! ======
//! The queue lives inside a `watch` channel so every mutation (add, expire,
//! dismiss, connection flag change) is pushed to all subscribed views. Each
//! toast gets its own expiry task; the task holds only a weak handle, so a
//! torn-down store is never kept alive by pending timers.
//!
//! TRADE-OFFS
//! ==========
//! The "connection degraded" warning is edge-triggered: it fires on each
//! transition of `connection_error` from `false` to `true` and re-arms once
//! the transport recovers. Repeated failure reports while already degraded
//! stay silent.

#[cfg(test)]
#[path = "notifications_test.rs"]
mod notifications_test;

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::watch;

use crate::error::TRANSPORT_DEGRADED_MESSAGE;

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Severity of a toast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// A transient user-facing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Monotonic per-store identifier, starting at 1.
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: OffsetDateTime,
}

/// Snapshot published to subscribers.
#[derive(Clone, Debug, Default)]
pub struct NotificationState {
    /// Live toasts in insertion order (newest last).
    pub items: Vec<Notification>,
    /// Set by the transport adapter while the real-time channel is down.
    pub connection_error: bool,
    next_id: u64,
}

impl NotificationState {
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.items.iter().any(|n| n.id == id)
    }
}

/// Shared notification store. Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct NotificationStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: watch::Sender<NotificationState>,
    ttl: Duration,
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl NotificationStore {
    /// Create an empty store whose toasts expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let (state, _) = watch::channel(NotificationState::default());
        Self { inner: Arc::new(Inner { state, ttl }) }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Subscribe to every subsequent state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NotificationState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> NotificationState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn connection_error(&self) -> bool {
        self.inner.state.borrow().connection_error
    }

    /// Append a toast and schedule its expiry. Returns the new toast's id.
    pub fn add_notification(&self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        let message = message.into();
        let mut id = 0;
        self.inner.state.send_modify(|state| {
            state.next_id += 1;
            id = state.next_id;
            state.items.push(Notification { id, message, kind, created_at: OffsetDateTime::now_utc() });
        });
        tracing::debug!(id, %kind, "notification added");
        self.schedule_expiry(id);
        id
    }

    /// Remove a toast immediately. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        remove(&self.inner.state, id)
    }

    /// Record the transport's health, surfacing a warning on entry into the
    /// degraded state.
    pub fn set_connection_error(&self, error: bool) {
        let mut entered_degraded = false;
        self.inner.state.send_if_modified(|state| {
            if state.connection_error == error {
                return false;
            }
            state.connection_error = error;
            entered_degraded = error;
            true
        });
        if entered_degraded {
            tracing::warn!("real-time connection degraded");
            self.add_notification(TRANSPORT_DEGRADED_MESSAGE, NotificationKind::Warning);
        }
    }

    fn schedule_expiry(&self, id: u64) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(id, "no async runtime; notification will not auto-expire");
            return;
        };
        let inner: Weak<Inner> = Arc::downgrade(&self.inner);
        let ttl = self.inner.ttl;
        runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = inner.upgrade() {
                if remove(&inner.state, id) {
                    tracing::debug!(id, "notification expired");
                }
            }
        });
    }
}

fn remove(state: &watch::Sender<NotificationState>, id: u64) -> bool {
    state.send_if_modified(|state| {
        let before = state.items.len();
        state.items.retain(|n| n.id != id);
        state.items.len() != before
    })
}
