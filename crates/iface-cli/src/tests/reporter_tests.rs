use super::*;
use iface_solver::{PendingDiagnostic, codes};

fn diagnostic() -> Diagnostic {
    Diagnostic::error(
        "C".to_string(),
        "'C' does not implement interface member 'I.M()'.".to_string(),
        codes::NOT_IMPLEMENTED,
    )
}

#[test]
fn test_plain_diagnostic_line() {
    let reporter = Reporter::new(false);
    assert_eq!(
        reporter.format_diagnostic(&diagnostic()),
        "C - error IF2001: 'C' does not implement interface member 'I.M()'."
    );
}

#[test]
fn test_related_information_is_indented() {
    let reporter = Reporter::new(false);
    let diag = diagnostic().with_related(
        "C.M".to_string(),
        "The closest candidate is 'C.M()'.".to_string(),
    );
    assert_eq!(
        reporter.format_diagnostic(&diag),
        "C - error IF2001: 'C' does not implement interface member 'I.M()'.\n  C.M - The closest candidate is 'C.M()'."
    );
}

#[test]
fn test_missing_location_is_named() {
    let reporter = Reporter::new(false);
    let mut diag = diagnostic();
    diag.location.clear();
    assert!(reporter.format_diagnostic(&diag).starts_with("<unit> - error"));
}

#[test]
fn test_render_separates_diagnostics_by_line() {
    let reporter = Reporter::new(false);
    let rendered = reporter.render(&[diagnostic(), diagnostic()]);
    assert_eq!(rendered.lines().count(), 2);
}

#[test]
fn test_map_rendering() {
    let reporter = Reporter::new(false);
    let maps = vec![
        MapView {
            type_name: "C".to_string(),
            malformed: None,
            slots: vec![
                SlotView {
                    slot: "I.M()".to_string(),
                    resolution: ResolutionView::Resolved {
                        member: "B.M()".to_string(),
                        via: "implicit",
                    },
                    emitted: Some(EmittedView::Stub {
                        name: "I.M".to_string(),
                        target: "B.M()".to_string(),
                        reason: "inherited implementation",
                    }),
                },
                SlotView {
                    slot: "I.N()".to_string(),
                    resolution: ResolutionView::Unresolved {
                        reason: "not public",
                        closest: Some("C.N()".to_string()),
                    },
                    emitted: None,
                },
            ],
        },
        MapView {
            type_name: "D".to_string(),
            malformed: None,
            slots: Vec::new(),
        },
    ];
    assert_eq!(
        reporter.render_maps(&maps),
        "C\n  I.M() => stub I.M -> B.M() [inherited implementation]\n  I.N() => unimplemented (not public, closest C.N())\nD (no interface slots)"
    );
}

#[test]
fn test_summary_counts_errors_only() {
    let reporter = Reporter::new(false);
    let mut output = CheckOutput::default();
    assert_eq!(reporter.summary(&output), "");
    output
        .diagnostics
        .push(PendingDiagnostic::error(codes::NOT_IMPLEMENTED, Vec::new()));
    assert_eq!(reporter.summary(&output), "Found 1 error.");
    output
        .diagnostics
        .push(PendingDiagnostic::error(codes::NOT_IMPLEMENTED, Vec::new()));
    assert_eq!(reporter.summary(&output), "Found 2 errors.");
}
