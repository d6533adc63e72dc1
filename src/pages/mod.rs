//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped data loading and delegates rendering details
//! to `components`. Pages never enforce authentication themselves; the
//! route gate in `routes` decides whether they are reached at all.

pub mod dashboard;
pub mod job_details;
pub mod job_form;
pub mod layout;
pub mod login;
pub mod register;
