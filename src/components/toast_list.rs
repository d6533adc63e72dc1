//! Toast stack rendered beneath every screen.

#[cfg(test)]
#[path = "toast_list_test.rs"]
mod toast_list_test;

use crate::state::notifications::{Notification, NotificationKind, NotificationState};

fn marker(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Info => "i",
        NotificationKind::Success => "+",
        NotificationKind::Warning => "!",
        NotificationKind::Error => "x",
    }
}

fn toast_line(n: &Notification) -> String {
    format!(
        "({}) #{} {:02}:{:02}:{:02} {}",
        marker(n.kind),
        n.id,
        n.created_at.hour(),
        n.created_at.minute(),
        n.created_at.second(),
        n.message
    )
}

/// One line per live toast, oldest first.
#[must_use]
pub fn render_toasts(state: &NotificationState) -> Vec<String> {
    state.items.iter().map(toast_line).collect()
}
