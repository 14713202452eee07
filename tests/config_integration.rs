//! Integration tests for `.jsx-conditional.toml` loading and resolution

use jsx_conditional::config::{
    discover, load_from_path, load_from_str, ConfigError, Severity, ValidationIssue,
    CONFIG_FILE_NAME,
};
use jsx_conditional::registry::RuleRegistry;
use jsx_conditional::{Dialect, Linter, OptionsError};
use std::fs;
use tempfile::TempDir;

fn issues(input: &str) -> Vec<ValidationIssue> {
    match load_from_str(input, &RuleRegistry::builtin()) {
        Err(ConfigError::Validation { source, .. }) => source.issues,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn empty_config_uses_recommended_preset() {
    let registry = RuleRegistry::builtin();
    let config = load_from_str("", &registry).unwrap();
    let active = config.resolve(&registry).unwrap();

    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "jsx-conditional");
    assert_eq!(active[0].severity, Severity::Error);
}

#[test]
fn full_config() {
    let registry = RuleRegistry::builtin();
    let config = load_from_str(
        r#"
extends = "all"
ignore = ["dist", "build"]

[rules.jsx-conditional]
severity = "warn"
options = ["prefer-and-operator", { exceptNotNullishAlternates = true }]
"#,
        &registry,
    )
    .unwrap();

    assert_eq!(config.ignore, vec!["dist", "build"]);
    let linter = Linter::new(config.resolve(&registry).unwrap());
    assert_eq!(linter.rules()[0].severity, Severity::Warn);

    let messages = linter
        .lint_source(
            Dialect::Jsx,
            "<div>{a ? <A /> : <B />}{b ? <C /> : null}</div>",
        )
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_id, "preferAndOperator");
}

#[test]
fn numeric_severities() {
    let registry = RuleRegistry::builtin();
    let config = load_from_str("[rules.jsx-conditional]\nseverity = 1\n", &registry).unwrap();
    assert_eq!(config.rules["jsx-conditional"].severity, Severity::Warn);

    let config = load_from_str("[rules.jsx-conditional]\nseverity = 0\n", &registry).unwrap();
    assert!(config.resolve(&registry).unwrap().is_empty());

    let err = load_from_str("[rules.jsx-conditional]\nseverity = 3\n", &registry).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }));
}

#[test]
fn off_rule_is_not_instantiated() {
    let registry = RuleRegistry::builtin();
    let config = load_from_str("[rules.jsx-conditional]\nseverity = \"off\"\n", &registry).unwrap();
    let linter = Linter::new(config.resolve(&registry).unwrap());
    let messages = linter
        .lint_source(Dialect::Jsx, "<div>{a && <b />}</div>")
        .unwrap();
    assert!(messages.is_empty());
}

#[test]
fn unknown_rule_gets_suggestion() {
    let found = issues("[rules.jsx-conditionl]\n");
    assert_eq!(found.len(), 1);
    assert!(matches!(
        &found[0],
        ValidationIssue::UnknownRule {
            suggestion: Some("jsx-conditional"),
            ..
        }
    ));
}

#[test]
fn invalid_preference_is_rejected() {
    let found = issues("[rules.jsx-conditional]\noptions = [\"prefer-or\"]\n");
    assert!(matches!(
        &found[0],
        ValidationIssue::InvalidOptions {
            source: OptionsError::InvalidPreference { .. },
            ..
        }
    ));
}

#[test]
fn unknown_option_key_gets_suggestion() {
    let found = issues(
        "[rules.jsx-conditional]\noptions = [\"prefer-and-operator\", { exceptNotNullishAlternate = true }]\n",
    );
    match &found[0] {
        ValidationIssue::InvalidOptions {
            source: OptionsError::UnknownKey { key, suggestion },
            ..
        } => {
            assert_eq!(key, "exceptNotNullishAlternate");
            assert_eq!(*suggestion, Some("exceptNotNullishAlternates"));
        }
        other => panic!("unexpected issue {other:?}"),
    }
}

#[test]
fn unknown_preset_and_rule_are_both_reported() {
    let found = issues("extends = \"recomended\"\n[rules.nope]\n");
    assert_eq!(found.len(), 2);
    assert!(found.iter().any(|issue| matches!(
        issue,
        ValidationIssue::UnknownPreset {
            suggestion: Some("recommended"),
            ..
        }
    )));
}

#[test]
fn unknown_top_level_key_is_a_toml_error() {
    let err = load_from_str("exclude = [\"dist\"]\n", &RuleRegistry::builtin()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml { .. }));
}

#[test]
fn discovered_file_loads_with_path_in_errors() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("app/components");
    fs::create_dir_all(&nested).unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[rules.jsx-conditional]\noptions = [1]\n").unwrap();

    let found = discover(&nested).unwrap();
    assert_eq!(found, path);

    let err = load_from_path(&found, &RuleRegistry::builtin()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains(CONFIG_FILE_NAME), "{message}");
    assert!(message.contains("jsx-conditional"), "{message}");
}
