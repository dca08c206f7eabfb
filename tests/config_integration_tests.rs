//! Tests for rule file loading and validation.

use std::fs;

use branch_name_lint::rules::loader;
use branch_name_lint::validation::Linter;
use tempfile::TempDir;

#[test]
fn test_load_toml_rule_file() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("branchlint.toml");
    fs::write(
        &path,
        r#"
            separator = "-"
            banned = ["junk"]

            [[params]]
            name = "kind"
            required = true
            position = 0
            options = ["task", "spike"]

            [[params]]
            name = "slug"
            required = true
            position = 1
            regex = "[a-z0-9]+"
        "#,
    )
    .expect("write rule file");

    let rules = loader::load_file(&path).expect("load rule file");
    assert_eq!(rules.separator, "-");
    assert_eq!(rules.rules().len(), 2);

    let linter = Linter::new(&rules);
    assert!(linter.evaluate("task-cleanup").is_success());
    assert!(!linter.evaluate("chore-cleanup").is_success());
    assert!(!linter.evaluate("junk").is_success());
}

#[test]
fn test_load_json_rule_file() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("branchlint.json");
    fs::write(
        &path,
        r#"{
            "separator": "/",
            "params": [
                {
                    "name": "prefix",
                    "required": true,
                    "position": 0,
                    "options": ["feature", "hotfix"]
                },
                {
                    "name": "description",
                    "required": true,
                    "position": 1,
                    "regex": "[a-z0-9.-]+"
                }
            ]
        }"#,
    )
    .expect("write rule file");

    let rules = loader::load_file(&path).expect("load rule file");
    let linter = Linter::new(&rules);
    assert!(linter.evaluate("feature/login-fix").is_success());
    assert!(!linter.evaluate("feat/login-fix").is_success());
}

#[test]
fn test_missing_rule_file_errors() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("nope.toml");
    let err = loader::load_file(&path).expect_err("missing file must error");
    assert!(err.to_string().contains("failed to read rule file"));
}

#[test]
fn test_malformed_toml_errors() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("branchlint.toml");
    fs::write(&path, "separator = [broken").expect("write rule file");
    let err = loader::load_file(&path).expect_err("malformed file must error");
    assert!(err.to_string().contains("invalid TOML rule file"));
}

#[test]
fn test_invalid_rule_set_errors_at_load() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("branchlint.toml");
    // Two rules but an empty separator: rejected at construction time.
    fs::write(
        &path,
        r#"
            separator = ""

            [[params]]
            name = "a"
            required = true
            position = 0
            regex = "x+"

            [[params]]
            name = "b"
            required = true
            position = 1
            regex = "y+"
        "#,
    )
    .expect("write rule file");
    let err = loader::load_file(&path).expect_err("invalid rule set must error");
    assert!(err.to_string().contains("invalid rule set"));
}

#[test]
fn test_explicit_path_beats_discovery() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("custom.toml");
    fs::write(
        &path,
        r#"
            [[params]]
            name = "only"
            required = true
            position = 0
            regex = "[a-z]+"
        "#,
    )
    .expect("write rule file");

    let rules = loader::load(Some(&path)).expect("load explicit rule file");
    assert_eq!(rules.rules().len(), 1);
    assert_eq!(rules.rules()[0].name(), "only");
}
