use objrest_common::diagnostics::get_message_template;
use objrest_common::{
    Diagnostic, DiagnosticCategory, diagnostic_codes, diagnostic_messages, format_message,
};

#[test]
fn test_format_message_positional_args() {
    assert_eq!(format_message("{0} and {1}", &["a", "b"]), "a and b");
    assert_eq!(format_message("no args", &[]), "no args");
}

#[test]
fn test_diagnostic_from_message() {
    let diag = Diagnostic::from_message(
        &diagnostic_messages::USE_BUILT_INS_MUST_BE_BOOLEAN,
        &["useBuiltIns", "string \"yes\""],
    );
    assert_eq!(diag.code, diagnostic_codes::USE_BUILT_INS_MUST_BE_BOOLEAN);
    assert_eq!(diag.category, DiagnosticCategory::Error);
    assert!(diag.is_error());
    assert!(diag.message_text.contains("'useBuiltIns'"));
    assert!(diag.message_text.contains("string \"yes\""));
    assert!(diag.to_string().starts_with("error OR9001: "));
}

#[test]
fn test_message_templates_are_registered() {
    for message in diagnostic_messages::ALL {
        assert_eq!(get_message_template(message.code), Some(message.message));
    }
    assert_eq!(get_message_template(1), None);
}
