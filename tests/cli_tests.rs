mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn emmet_assist() -> Command {
    let mut cmd = Command::cargo_bin("emmet-assist").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_extract_inside_element() {
    emmet_assist()
        .args(["extract", "<div>ul>li*3</div>", "--column", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abbreviation: ul>li"))
        .stdout(predicate::str::contains("columns: 5..10"));
}

#[test]
fn test_extract_json_with_filter() {
    emmet_assist()
        .args(["extract", "ul>li|bem", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""abbreviation":"ul>li""#))
        .stdout(predicate::str::contains(r#""filter":"bem""#));
}

#[test]
fn test_extract_nothing_found() {
    emmet_assist()
        .args(["extract", "   "])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No abbreviation found"));
}

#[test]
fn test_validate_valid_abbreviation() {
    emmet_assist()
        .args(["validate", "html", "ul>li*3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn test_validate_explains_rejection() {
    emmet_assist()
        .args(["validate", "css", "color:", "--explain"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("invalid (trailing-colon)"));
}

#[test]
fn test_mode_maps_language() {
    emmet_assist()
        .args(["mode", "typescriptreact"])
        .assert()
        .success()
        .stdout(predicate::str::diff("jsx\n"));
}

#[test]
fn test_mode_respects_exclusions() {
    emmet_assist()
        .args(["mode", "html", "--exclude", "html"])
        .assert()
        .code(1);
}

#[test]
fn test_profile_translation() {
    emmet_assist()
        .args(["profile", r#"{"tag_case":"upper","self_closing_tag":true}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""tagCase": "upper""#))
        .stdout(predicate::str::contains(r#""selfClosingStyle": "xml""#));
}

#[test]
fn test_profile_rejects_bad_json() {
    emmet_assist()
        .args(["profile", "{oops"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Profile must be valid JSON"));
}

#[test]
fn test_customizations_summary() {
    let dir = tempfile::tempdir().unwrap();
    common::write_extensions(
        dir.path(),
        r#"{ "variables": { "lang": "fr" }, "css": { "snippets": { "bgx": "background: #fff;", "fw": "font-weight: bold;" } } }"#,
        Some(r#"{ "html": { "tag_case": "lower" } }"#),
    );

    emmet_assist()
        .arg("customizations")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("variables: 1"))
        .stdout(predicate::str::contains("2 snippets"))
        .stdout(predicate::str::contains("profiles: html"));
}

#[test]
fn test_customizations_missing_directory() {
    let dir = tempfile::tempdir().unwrap();

    emmet_assist()
        .arg("customizations")
        .arg(dir.path().join("missing"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load customizations"));
}
