use super::*;
use std::collections::BTreeSet;

#[test]
fn test_codes_are_unique() {
    let mut seen = BTreeSet::new();
    for message in DIAGNOSTIC_MESSAGES {
        assert!(seen.insert(message.code), "duplicate code {}", message.code);
    }
}

#[test]
fn test_format_message_fills_placeholders() {
    let template = get_message_template(diagnostic_codes::INTERFACE_MEMBER_NOT_IMPLEMENTED)
        .expect("template should exist");
    let text = format_message(template, &["C", "I.M()"]);
    assert_eq!(text, "'C' does not implement interface member 'I.M()'.");
}

#[test]
fn test_format_message_repeated_placeholder() {
    let text = format_message(
        diagnostic_messages::INVALID_VARIANCE,
        &["I.M()", "T", "covariant", "contravariantly"],
    );
    assert_eq!(
        text,
        "Invalid variance: The type parameter 'T' must be contravariantly valid on 'I.M()'. 'T' is covariant."
    );
}

#[test]
fn test_unknown_code_has_no_template() {
    assert!(get_message_template(42).is_none());
}

#[test]
fn test_every_family_is_represented() {
    for code in [1001, 2001, 3001, 4001, 5001, 6001, 9001] {
        assert_eq!(
            get_diagnostic_category(code),
            Some(DiagnosticCategory::Error),
            "missing code {code}"
        );
    }
}

#[test]
fn test_related_information_code_is_a_message() {
    assert_eq!(
        get_diagnostic_category(diagnostic_codes::CLOSEST_CANDIDATE),
        Some(DiagnosticCategory::Message)
    );
}

#[test]
fn test_diagnostic_serializes_camel_case() {
    let diag = Diagnostic::error("C".to_string(), "boom".to_string(), 2001)
        .with_related("C.M".to_string(), "closest candidate".to_string());
    let json = serde_json::to_value(&diag).expect("serialize");
    assert_eq!(json["messageText"], "boom");
    assert_eq!(json["category"], "error");
    assert_eq!(json["relatedInformation"][0]["location"], "C.M");
}

#[test]
fn test_format_message_does_not_rescan_arguments() {
    assert_eq!(format_message("'{0}' and '{1}'", &["{1}", "x"]), "'{1}' and 'x'");
    assert_eq!(format_message("{2} {x} {", &["a"]), "{2} {x} {");
}
