//! Job create/edit screen.

use crate::components::form_view::{FieldView, SubmitLabels, render_form};
use crate::forms::FormState;
use crate::forms::job::JobFormMode;

const FIELDS: &[FieldView] = &[
    FieldView::plain("company", "Company"),
    FieldView::plain("position", "Position"),
    FieldView::plain("status", "Status (applied/interviewing/offered/rejected)"),
    FieldView::plain("location", "Location"),
    FieldView::plain("job_url", "Job posting URL"),
    FieldView::plain("notes", "Notes"),
];

#[must_use]
pub fn render(mode: &JobFormMode, state: &FormState) -> Vec<String> {
    let (title, labels) = match mode {
        JobFormMode::Create => ("Add Job Application", SubmitLabels { idle: "Add job", busy: "Saving..." }),
        JobFormMode::Edit(_) => ("Edit Job Application", SubmitLabels { idle: "Update job", busy: "Saving..." }),
    };
    let mut lines = vec![title.to_owned()];
    lines.extend(render_form(FIELDS, state, labels));
    lines
}
