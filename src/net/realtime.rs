//! WebSocket adapter for server-pushed notifications.
//!
//! The adapter owns one background task per authenticated session. It
//! connects with the session token, turns `notification` frames into toasts,
//! and reconnects with exponential backoff after any failure.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures never surface as errors to callers. They are reported
//! through [`NotificationStore::set_connection_error`] and logged; the loop
//! keeps retrying until the handle is stopped or dropped.

#[cfg(test)]
#[path = "realtime_test.rs"]
mod realtime_test;

use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::state::notifications::{NotificationKind, NotificationStore};

pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
pub const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Backoff to wait after `current`: doubled, capped at [`MAX_BACKOFF`].
#[must_use]
pub fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}

/// Append the session token as a `token` query parameter.
#[must_use]
pub fn socket_url(base: &str, token: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}token={token}")
}

/// Frames the server may push.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Notification {
        message: String,
        #[serde(default)]
        kind: NotificationKind,
    },
    #[serde(other)]
    Other,
}

/// Decode a text frame. Malformed JSON yields `None`.
#[must_use]
pub fn parse_event(text: &str) -> Option<ServerEvent> {
    serde_json::from_str(text).ok()
}

/// Running connection loop. Dropping the handle stops it.
pub struct RealtimeHandle {
    task: JoinHandle<()>,
}

impl RealtimeHandle {
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for RealtimeHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start the connection loop on the current runtime.
#[must_use]
pub fn spawn(url: &str, token: &str, notifications: NotificationStore) -> RealtimeHandle {
    let url = socket_url(url, token);
    RealtimeHandle { task: tokio::spawn(run(url, notifications)) }
}

async fn run(url: String, notifications: NotificationStore) {
    let mut backoff = INITIAL_BACKOFF;
    loop {
        match connect_async(url.as_str()).await {
            Ok((mut stream, _)) => {
                tracing::info!("realtime connected");
                notifications.set_connection_error(false);
                backoff = INITIAL_BACKOFF;

                while let Some(message) = stream.next().await {
                    match message {
                        Ok(Message::Text(text)) => dispatch(text.as_str(), &notifications),
                        Ok(Message::Close(_)) => break,
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(error = %e, "realtime read failed");
                            break;
                        }
                    }
                }
                tracing::info!("realtime disconnected");
            }
            Err(e) => {
                tracing::warn!(error = %e, "realtime connect failed");
            }
        }

        notifications.set_connection_error(true);
        tokio::time::sleep(backoff).await;
        backoff = next_backoff(backoff);
    }
}

fn dispatch(text: &str, notifications: &NotificationStore) {
    match parse_event(text) {
        Some(ServerEvent::Notification { message, kind }) => {
            notifications.add_notification(message, kind);
        }
        Some(ServerEvent::Other) => tracing::debug!("ignoring realtime frame"),
        None => tracing::debug!(len = text.len(), "unparseable realtime frame"),
    }
}
