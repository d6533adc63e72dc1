//! Networking modules for the REST API and the real-time channel.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls, `realtime` manages the websocket lifecycle,
//! and `types` defines the shared wire schema.

pub mod api;
pub mod realtime;
pub mod types;
