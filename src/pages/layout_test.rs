use super::*;
use crate::test_helpers::stub_user;

#[test]
fn shell_puts_nav_above_outlet() {
    let lines = shell(&stub_user(), &Route::Dashboard, vec!["content".to_owned()]);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("[Dashboard]"));
    assert!(lines[0].contains("Ada (logout)"));
    assert_eq!(lines[2], "content");
}

#[test]
fn not_found_names_the_path() {
    assert_eq!(not_found("/nope")[0], "Page not found: /nope");
}
