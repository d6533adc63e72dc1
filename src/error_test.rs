use super::*;

#[test]
fn auth_message_with_email_or_password_is_localized() {
    let err = ClientError::Auth { reason: "Invalid Email or Password".to_owned() };
    assert_eq!(err.user_message(), INVALID_CREDENTIALS_MESSAGE);
}

#[test]
fn other_auth_reasons_pass_through() {
    let err = ClientError::Auth { reason: "Account locked".to_owned() };
    assert_eq!(err.user_message(), "Account locked");
}

#[test]
fn network_errors_use_generic_message() {
    let err = ClientError::Network("connection refused (os error 111)".to_owned());
    assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
}

#[test]
fn api_unauthorized_converts_to_auth() {
    let err = ClientError::from(ApiError::Unauthorized { message: "expired".to_owned() });
    assert_eq!(err, ClientError::Auth { reason: "expired".to_owned() });
}

#[test]
fn api_rejected_converts_to_request_by_default() {
    let err = ClientError::from(ApiError::Rejected { status: 404, message: "Job not found".to_owned() });
    assert_eq!(err, ClientError::Request("Job not found".to_owned()));
}

#[test]
fn from_auth_treats_rejections_as_auth_errors() {
    let err = ClientError::from_auth(ApiError::Rejected { status: 409, message: "User already exists".to_owned() });
    assert_eq!(err, ClientError::Auth { reason: "User already exists".to_owned() });
}

#[test]
fn from_auth_keeps_network_category() {
    let err = ClientError::from_auth(ApiError::Network("timed out".to_owned()));
    assert_eq!(err, ClientError::Network("timed out".to_owned()));
}

#[test]
fn validation_error_display_counts_fields() {
    let mut errors = FieldErrors::new();
    errors.insert("email", "Email is required".to_owned());
    assert_eq!(ClientError::Validation(errors).to_string(), "validation failed for 1 field(s)");
}
