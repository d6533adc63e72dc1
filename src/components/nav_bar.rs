//! Navigation bar of the authenticated shell.

use crate::net::types::UserSummary;
use crate::routes::Route;

const LINKS: [(&str, &str); 2] = [("Dashboard", "/dashboard"), ("New job", "/jobs/new")];

/// Render the nav bar, bracketing the link for the active route.
#[must_use]
pub fn render_nav(user: &UserSummary, active: &Route) -> String {
    let active_path = active.path();
    let links: Vec<String> = LINKS
        .iter()
        .map(|(label, path)| {
            if *path == active_path {
                format!("[{label}]")
            } else {
                format!(" {label} ")
            }
        })
        .collect();
    format!("{} | {} (logout)", links.join("|"), user.display_name)
}
