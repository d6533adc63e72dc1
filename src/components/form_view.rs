//! Generic form renderer: labelled fields, inline errors, submit control.

#[cfg(test)]
#[path = "form_view_test.rs"]
mod form_view_test;

use crate::forms::FormState;

/// Display metadata for one form field.
#[derive(Clone, Copy, Debug)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    /// Mask the value (passwords).
    pub secret: bool,
}

impl FieldView {
    #[must_use]
    pub const fn plain(name: &'static str, label: &'static str) -> Self {
        Self { name, label, secret: false }
    }

    #[must_use]
    pub const fn secret(name: &'static str, label: &'static str) -> Self {
        Self { name, label, secret: true }
    }
}

/// Labels for the submit control in its idle and busy states.
#[derive(Clone, Copy, Debug)]
pub struct SubmitLabels {
    pub idle: &'static str,
    pub busy: &'static str,
}

fn display_value(field: &FieldView, value: &str) -> String {
    if field.secret {
        "*".repeat(value.chars().count())
    } else {
        value.to_owned()
    }
}

/// Render `state` as lines: form-level error first, then each field with its
/// inline error, then the submit control (disabled while submitting).
#[must_use]
pub fn render_form(fields: &[FieldView], state: &FormState, labels: SubmitLabels) -> Vec<String> {
    let mut lines = Vec::with_capacity(fields.len() * 2 + 2);
    if let Some(message) = state.form_error() {
        lines.push(format!("! {message}"));
    }
    for field in fields {
        let value = display_value(field, state.value(field.name));
        lines.push(format!("  {} ({}): {value}", field.label, field.name));
        if let Some(error) = state.error(field.name) {
            lines.push(format!("      ! {error}"));
        }
    }
    if state.submitting {
        lines.push(format!("  [{}] (disabled)", labels.busy));
    } else {
        lines.push(format!("  [{}] -> type `submit`", labels.idle));
    }
    lines
}
