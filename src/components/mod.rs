//! Reusable text-rendering components shared by pages.
//!
//! ARCHITECTURE
//! ============
//! Components are pure functions from state snapshots to lines of text, so
//! every piece of screen output can be asserted on without a terminal.

pub mod form_view;
pub mod nav_bar;
pub mod toast_list;
