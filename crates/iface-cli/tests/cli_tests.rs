//! End-to-end checks of `iface check`: loading a unit from disk, applying
//! command-line capabilities and writing text and JSON reports.

use clap::Parser;
use iface_cli::args::{CheckArgs, CliArgs, Command};
use iface_cli::driver::run_check;
use iface_cli::reporter::write_report;
use std::io::Write;
use tempfile::NamedTempFile;

const UNIT: &str = r#"{
    "types": [
        { "name": "I1", "kind": "interface",
          "members": [
            { "kind": "method", "name": "M", "modifiers": ["static", "abstract"] },
            { "kind": "method", "name": "N" }
          ] },
        { "name": "C", "kind": "class", "interfaces": ["I1"],
          "members": [
            { "kind": "method", "name": "M", "modifiers": ["public", "static"], "hasBody": true },
            { "kind": "method", "name": "N", "modifiers": ["public"], "hasBody": true }
          ] },
        { "name": "D", "kind": "class", "interfaces": ["I1"],
          "members": [
            { "kind": "method", "name": "M", "modifiers": ["public"], "hasBody": true }
          ] }
    ]
}"#;

fn unit_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write unit");
    file
}

fn check_args(file: &NamedTempFile, extra: &[&str]) -> CheckArgs {
    let path = file.path().to_str().expect("utf-8 temp path");
    let mut argv = vec!["iface", "check", path, "--color", "never"];
    argv.extend_from_slice(extra);
    match CliArgs::try_parse_from(argv).expect("arguments parse").command {
        Command::Check(check) => check,
    }
}

fn report(args: &CheckArgs) -> (bool, String) {
    let run = run_check(args).expect("unit loads");
    let mut out = Vec::new();
    write_report(&run, args, false, &mut out).expect("report written");
    (
        run.output.has_errors(),
        String::from_utf8(out).expect("utf-8 report"),
    )
}

#[test]
fn test_text_report_lists_unimplemented_members() {
    let file = unit_file(UNIT);
    let (has_errors, text) = report(&check_args(&file, &[]));
    assert!(has_errors);
    assert!(
        text.contains("D - error IF2002: "),
        "instance D.M cannot implement static I1.M:\n{text}"
    );
    assert!(text.contains("D - error IF2001: "), "{text}");
    assert!(!text.contains("C - error"), "{text}");
    assert!(text.trim_end().ends_with("Found 2 errors."), "{text}");
}

#[test]
fn test_lang_version_flag_overrides_unit_options() {
    let file = unit_file(UNIT);
    let (_, text) = report(&check_args(&file, &["--lang-version", "10"]));
    assert!(text.contains("I1.M - error IF4001: "), "{text}");
}

#[test]
fn test_no_runtime_features_gates_static_abstract_members() {
    let file = unit_file(UNIT);
    let (_, text) = report(&check_args(&file, &["--no-runtime-features"]));
    assert!(text.contains("I1.M - error IF4002: "), "{text}");
}

#[test]
fn test_json_report_with_maps() {
    let file = unit_file(UNIT);
    let (_, text) = report(&check_args(&file, &["--format", "json", "--emit-map"]));
    let json: serde_json::Value = serde_json::from_str(&text).expect("valid JSON report");

    assert_eq!(json["capabilities"]["languageVersion"], "11");
    assert_eq!(json["errorCount"], 2);
    let codes: Vec<u64> = json["diagnostics"]
        .as_array()
        .expect("diagnostics array")
        .iter()
        .map(|diag| diag["code"].as_u64().expect("numeric code"))
        .collect();
    assert_eq!(codes, vec![2002, 2001]);

    let maps = json["maps"].as_array().expect("maps array");
    assert_eq!(maps.len(), 2);
    assert_eq!(maps[0]["type"], "C");
    let c_slots = maps[0]["slots"].as_array().expect("slots");
    assert_eq!(c_slots.len(), 2);
    assert_eq!(c_slots[0]["slot"], "I1.M()");
    assert_eq!(c_slots[0]["resolution"]["kind"], "resolved");
    assert_eq!(c_slots[0]["emitted"]["member"], "C.M()");
    assert_eq!(maps[1]["slots"][1]["resolution"]["reason"], "missing");
}

#[test]
fn test_text_map_output() {
    let file = unit_file(UNIT);
    let (_, text) = report(&check_args(&file, &["--emit-map"]));
    assert!(
        text.contains("\nC\n  I1.M() => C.M() [implicit]\n  I1.N() => C.N() [implicit]\n"),
        "{text}"
    );
    assert!(text.contains("  I1.N() => unimplemented (missing)"), "{text}");
}

#[test]
fn test_malformed_json_names_the_file() {
    let file = unit_file("{ \"types\": [ { \"name\": ");
    let err = match run_check(&check_args(&file, &[])) {
        Ok(_) => panic!("truncated unit must not load"),
        Err(err) => err,
    };
    let message = format!("{err:#}");
    assert!(message.contains("failed to parse compilation unit"), "{message}");
    assert!(message.contains(&file.path().display().to_string()), "{message}");
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.json");
    let argv = ["iface", "check", path.to_str().expect("utf-8 path")];
    let Command::Check(args) = CliArgs::try_parse_from(argv).expect("arguments parse").command;
    let err = run_check(&args).err().expect("missing unit");
    assert!(format!("{err:#}").contains("failed to read"));
}
