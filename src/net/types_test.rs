use super::*;

#[test]
fn error_message_is_kept_verbatim() {
    let message = ErrorBody::message_from(r#"{"error":"  Invalid credentials\n"}"#);
    assert_eq!(message.as_deref(), Some("  Invalid credentials\n"));
}

#[test]
fn empty_error_message_is_absent() {
    assert_eq!(ErrorBody::message_from(r#"{"error":""}"#), None);
}

#[test]
fn non_json_error_body_is_absent() {
    assert_eq!(ErrorBody::message_from("<html>bad gateway</html>"), None);
}
