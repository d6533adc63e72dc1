//! Shared client state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` tracks the signed-in user, `notifications` holds the toast queue
//! and transport health, and `token` persists the bearer token between runs.
//! Each store is the single writer of its own state and publishes changes
//! over a `watch` channel.

pub mod notifications;
pub mod session;
pub mod token;
