//! Client configuration parsed from environment variables.
//!
//! Variables (all optional):
//! - `JOBTRACKER_API_URL`: REST base URL, default `http://localhost:5000/api`
//! - `JOBTRACKER_WS_URL`: real-time endpoint; derived from the API URL when absent
//! - `JOBTRACKER_DATA_DIR`: token directory, default `$HOME/.jobtracker`
//! - `JOBTRACKER_REALTIME`: `false`/`0`/`off` disables the real-time channel
//! - `JOBTRACKER_NOTIFICATION_TTL_MS`: toast lifetime, default 5000
//! - `JOBTRACKER_REQUEST_TIMEOUT_SECS`: default 30

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

use crate::net::api::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::state::notifications::DEFAULT_NOTIFICATION_TTL;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DATA_DIR_NAME: &str = ".jobtracker";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub ws_url: Option<String>,
    /// `None` keeps the token in memory only.
    pub data_dir: Option<PathBuf>,
    pub realtime: bool,
    pub notification_ttl: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            ws_url: None,
            data_dir: None,
            realtime: true,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Build config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] for a malformed URL variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] for a malformed URL variable.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_url = match non_blank("JOBTRACKER_API_URL") {
            Some(url) => check_url("JOBTRACKER_API_URL", &url, &["http://", "https://"])?,
            None => DEFAULT_API_URL.to_owned(),
        };
        let ws_url = non_blank("JOBTRACKER_WS_URL")
            .map(|url| check_url("JOBTRACKER_WS_URL", &url, &["ws://", "wss://"]))
            .transpose()?;
        let data_dir = non_blank("JOBTRACKER_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| non_blank("HOME").map(|home| PathBuf::from(home).join(DATA_DIR_NAME)));
        let realtime = !matches!(
            non_blank("JOBTRACKER_REALTIME").map(|v| v.to_ascii_lowercase()).as_deref(),
            Some("0" | "false" | "off" | "no")
        );
        let notification_ttl = parse_u64(non_blank("JOBTRACKER_NOTIFICATION_TTL_MS"))
            .map_or(DEFAULT_NOTIFICATION_TTL, Duration::from_millis);
        let request_timeout = Duration::from_secs(
            parse_u64(non_blank("JOBTRACKER_REQUEST_TIMEOUT_SECS")).unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );

        Ok(Self { api_url, ws_url, data_dir, realtime, notification_ttl, request_timeout })
    }

    /// Real-time endpoint, or `None` when the channel is disabled.
    ///
    /// Without an explicit URL, the API URL's scheme is swapped for its
    /// WebSocket counterpart and `/ws` appended.
    #[must_use]
    pub fn realtime_url(&self) -> Option<String> {
        if !self.realtime {
            return None;
        }
        if let Some(url) = &self.ws_url {
            return Some(url.clone());
        }
        let derived = if let Some(rest) = self.api_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.api_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            return None;
        };
        Some(format!("{}/ws", derived.trim_end_matches('/')))
    }
}

fn check_url(var: &'static str, value: &str, schemes: &[&str]) -> Result<String, ConfigError> {
    let ok = schemes
        .iter()
        .any(|scheme| value.len() > scheme.len() && value.to_ascii_lowercase().starts_with(scheme));
    if ok {
        Ok(value.trim_end_matches('/').to_owned())
    } else {
        Err(ConfigError::InvalidUrl { var, value: value.to_owned() })
    }
}

fn parse_u64(raw: Option<String>) -> Option<u64> {
    raw.and_then(|v| v.parse::<u64>().ok())
}
