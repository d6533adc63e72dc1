//! # jobtracker
//!
//! Terminal client for the job application tracker API.
//!
//! The crate is split the way a UI client usually is: `state` holds the
//! session and notification stores, `net` talks to the REST API and the
//! real-time channel, `routes` gates paths on the session, `forms` drives
//! validation and submission, and `pages`/`components` render screens as
//! text. `app` ties them together and `shell` drives it from a terminal.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod forms;
pub mod net;
pub mod pages;
pub mod routes;
pub mod shell;
pub mod state;

#[cfg(test)]
mod test_helpers;
