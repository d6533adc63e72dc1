//! Screen chrome: the authenticated shell plus the loading and not-found
//! placeholders.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::components::nav_bar::render_nav;
use crate::net::types::UserSummary;
use crate::routes::Route;

const RULE: &str = "----------------------------------------";

/// Blocking indicator shown while the session is being restored.
#[must_use]
pub fn loading() -> Vec<String> {
    vec!["Loading...".to_owned()]
}

#[must_use]
pub fn not_found(path: &str) -> Vec<String> {
    vec![format!("Page not found: {path}"), "`go /` to return home".to_owned()]
}

/// Wrap `outlet` in the navigation bar for `user`.
#[must_use]
pub fn shell(user: &UserSummary, active: &Route, outlet: Vec<String>) -> Vec<String> {
    let mut lines = Vec::with_capacity(outlet.len() + 2);
    lines.push(render_nav(user, active));
    lines.push(RULE.to_owned());
    lines.extend(outlet);
    lines
}
