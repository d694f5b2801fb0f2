use super::*;

#[test]
fn test_severity_order() {
    use DiagnosticLevel::{Error, Fatal, Ignore, Note, Remark, Warning};
    let levels = [Ignore, Note, Remark, Warning, Error, Fatal];
    for pair in levels.windows(2) {
        assert!(pair[0] < pair[1], "{:?} < {:?}", pair[0], pair[1]);
    }
}

#[test]
fn test_is_error() {
    assert!(DiagnosticLevel::Fatal.is_error());
    assert!(DiagnosticLevel::Error.is_error());
    assert!(!DiagnosticLevel::Warning.is_error());
}

#[test]
fn test_display() {
    assert_eq!(DiagnosticLevel::Warning.to_string(), "warning");
    assert_eq!(DiagnosticLevel::Fatal.to_string(), "fatal error");
}
