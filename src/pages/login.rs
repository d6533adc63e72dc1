//! Login screen.

use crate::components::form_view::{FieldView, SubmitLabels, render_form};
use crate::forms::FormState;

const FIELDS: &[FieldView] = &[FieldView::plain("email", "Email address"), FieldView::secret("password", "Password")];
const LABELS: SubmitLabels = SubmitLabels { idle: "Sign in", busy: "Signing in..." };

#[must_use]
pub fn render(state: &FormState) -> Vec<String> {
    let mut lines = vec!["Welcome Back".to_owned(), "Sign in to manage your job applications".to_owned()];
    lines.extend(render_form(FIELDS, state, LABELS));
    lines.push("Don't have an account? `go /register`".to_owned());
    lines
}
