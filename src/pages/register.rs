//! Registration screen.

use crate::components::form_view::{FieldView, SubmitLabels, render_form};
use crate::forms::FormState;

const FIELDS: &[FieldView] = &[
    FieldView::plain("name", "Full name"),
    FieldView::plain("email", "Email address"),
    FieldView::secret("password", "Password"),
    FieldView::secret("confirm_password", "Confirm password"),
];
const LABELS: SubmitLabels = SubmitLabels { idle: "Create account", busy: "Creating account..." };

#[must_use]
pub fn render(state: &FormState) -> Vec<String> {
    let mut lines = vec!["Create Account".to_owned(), "Start tracking your job applications".to_owned()];
    lines.extend(render_form(FIELDS, state, LABELS));
    lines.push("Already have an account? `go /login`".to_owned());
    lines
}
