//! Config loading: error messages, partial documents, and plan overrides.

use assert_fs::prelude::*;
use rstest::rstest;
use shepherd_core::{
    config::{self, FleetConfig},
    ConfigError, MigrationPlan, ProbePredicate,
};

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn explicit_missing_config_returns_not_found() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let missing = home.path().join("nope.yaml");
    let err = config::resolve_at(home.path(), Some(&missing)).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("nope.yaml"));
}

#[test]
fn corrupt_yaml_returns_parse_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child("fleet.yaml");
    file.write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = config::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("fleet.yaml"));
}

#[test]
fn wrong_type_yaml_returns_parse_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child("fleet.yaml");
    file.write_str("- this is a list, not a mapping\n").expect("write");

    let err = config::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Partial documents fall back to defaults
// ---------------------------------------------------------------------------

#[test]
fn plan_section_overrides_only_named_fields() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child("fleet.yaml");
    file.write_str(
        "plan:\n  source: https://example.com/workflows.git\n  remove: [Jenkinsfile]\n",
    )
    .expect("write");

    let cfg = config::load(file.path()).expect("load");
    assert_eq!(cfg.plan.source, "https://example.com/workflows.git");
    assert_eq!(cfg.plan.remove, vec!["Jenkinsfile".to_string()]);
    assert_eq!(cfg.plan.copy, MigrationPlan::default().copy);
    assert_eq!(cfg.org, FleetConfig::default().org);
}

#[rstest]
#[case("probe:\n  contains: crmPipelineDotNetComponent\n", ProbePredicate::Contains("crmPipelineDotNetComponent".to_string()))]
#[case("probe:\n  path: Jenkinsfile\n", ProbePredicate::Exists)]
#[case("probe:\n  contains: null\n", ProbePredicate::Exists)]
fn probe_section_builds_predicate(#[case] yaml: &str, #[case] expected: ProbePredicate) {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child("fleet.yaml");
    file.write_str(yaml).expect("write");

    let cfg = config::load(file.path()).expect("load");
    assert_eq!(cfg.probe.predicate(), expected);
    assert_eq!(cfg.probe.path, "Jenkinsfile");
}

#[test]
fn repo_filter_reflects_config() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child("fleet.yaml");
    file.write_str(
        "org: acme\nrepo_suffix: -svc\nexclude_names: [old-svc]\nexclude_substring: demo\ninclude_archived: true\n",
    )
    .expect("write");

    let filter = config::load(file.path()).expect("load").repo_filter();
    assert_eq!(filter.org, "acme");
    assert_eq!(filter.suffix, "-svc");
    assert_eq!(filter.exclude_names, vec!["old-svc".to_string()]);
    assert_eq!(filter.exclude_substring.as_deref(), Some("demo"));
    assert!(filter.include_archived);
}
