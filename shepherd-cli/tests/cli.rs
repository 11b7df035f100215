use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's home, temp dir, and GitHub credentials.
fn isolated(bin: &str, cwd: &Path, sandbox: &TempDir) -> Command {
    let home = sandbox.path().join("home");
    let tmp = sandbox.path().join("tmp");
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&tmp).unwrap();

    let mut cmd = Command::cargo_bin(bin).unwrap();
    cmd.current_dir(cwd)
        .env("HOME", &home)
        .env("TMPDIR", &tmp)
        .env("RUST_LOG", "info")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_API_URL");
    cmd
}

fn seeded_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("README.md"), "# orders-dotnet\n").unwrap();
    fs::write(dir.path().join("Jenkinsfile"), "pipeline {}\n").unwrap();
    dir
}

// ---------------------------------------------------------------------------
// migrate-workflows
// ---------------------------------------------------------------------------

#[test]
fn help_exits_zero() {
    let sandbox = TempDir::new().unwrap();
    isolated("migrate-workflows", sandbox.path(), &sandbox)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--source"));
}

#[test]
fn refuses_outside_a_repository_root() {
    let sandbox = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    fs::write(target.path().join("Jenkinsfile"), "pipeline {}\n").unwrap();

    isolated("migrate-workflows", target.path(), &sandbox)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("safety check failed"))
        .stderr(predicate::str::contains("--force"));
    assert!(target.path().join("Jenkinsfile").exists());
}

#[test]
fn dry_run_reports_and_changes_nothing() {
    let sandbox = TempDir::new().unwrap();
    let target = seeded_repo();

    isolated("migrate-workflows", target.path(), &sandbox)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run] Would remove: Jenkinsfile"))
        .stdout(predicate::str::contains("[dry-run] Would copy: .github/"))
        .stdout(predicate::str::contains("Dry run completed."));

    assert!(target.path().join("Jenkinsfile").exists());
    assert!(!target.path().join(".github").exists());
    let mut names: Vec<_> = fs::read_dir(target.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Jenkinsfile", "README.md"]);
}

#[test]
fn unknown_flags_warn_and_are_ignored() {
    let sandbox = TempDir::new().unwrap();
    let target = seeded_repo();

    isolated("migrate-workflows", target.path(), &sandbox)
        .args(["--verbose", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown argument ignored: --verbose"))
        .stdout(predicate::str::contains("Dry run completed."));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let sandbox = TempDir::new().unwrap();
    let target = seeded_repo();

    isolated("migrate-workflows", target.path(), &sandbox)
        .args(["--dry-run", "--config", "nope.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config not found"));
}

#[test]
fn plan_comes_from_the_config_file() {
    let sandbox = TempDir::new().unwrap();
    let target = seeded_repo();
    fs::write(target.path().join("azure-pipelines.yml"), "trigger: none\n").unwrap();
    let config = sandbox.path().join("fleet.yaml");
    fs::write(
        &config,
        "plan:\n  remove: [azure-pipelines.yml]\n  copy: [.gitignore]\n",
    )
    .unwrap();

    isolated("migrate-workflows", target.path(), &sandbox)
        .arg("--dry-run")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Would remove: azure-pipelines.yml"))
        .stdout(predicate::str::contains("Would remove: Jenkinsfile").not());
}

#[test]
fn missing_option_value_is_a_usage_error_not_a_safety_refusal() {
    let sandbox = TempDir::new().unwrap();
    let target = seeded_repo();

    isolated("migrate-workflows", target.path(), &sandbox)
        .args(["--dry-run", "--source"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("a value is required"));
    assert!(target.path().join("Jenkinsfile").exists());
}

#[test]
fn version_exits_zero() {
    let sandbox = TempDir::new().unwrap();
    isolated("migrate-workflows", sandbox.path(), &sandbox)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("migrate-workflows"));
}

fn git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn relative_source_is_resolved_from_the_launch_directory() {
    let sandbox = TempDir::new().unwrap();
    let target = seeded_repo();
    let wf = target.path().join("wf");
    fs::create_dir_all(wf.join(".github/workflows")).unwrap();
    git(&wf, &["init"]);
    git(&wf, &["config", "user.name", "test-user"]);
    git(&wf, &["config", "user.email", "test@example.com"]);
    fs::write(wf.join(".github/workflows/ci.yml"), "on: push\n").unwrap();
    fs::write(wf.join(".gitignore"), "bin/\nobj/\n").unwrap();
    git(&wf, &["add", "."]);
    git(&wf, &["commit", "-m", "workflows"]);

    isolated("migrate-workflows", target.path(), &sandbox)
        .args(["--source", "./wf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Migration completed successfully."));

    assert!(!target.path().join("Jenkinsfile").exists());
    assert_eq!(
        fs::read_to_string(target.path().join(".gitignore")).unwrap(),
        "bin/\nobj/\n"
    );
    assert!(target.path().join(".github/workflows/ci.yml").exists());
}

// ---------------------------------------------------------------------------
// scan-repos / migrate-fleet
// ---------------------------------------------------------------------------

#[test]
fn scan_without_token_exits_one() {
    let sandbox = TempDir::new().unwrap();
    isolated("scan-repos", sandbox.path(), &sandbox)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn fleet_without_token_exits_one() {
    let sandbox = TempDir::new().unwrap();
    isolated("migrate-fleet", sandbox.path(), &sandbox)
        .arg("--apply")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn token_is_checked_before_the_config_is_read() {
    let sandbox = TempDir::new().unwrap();
    for bin in ["scan-repos", "migrate-fleet"] {
        isolated(bin, sandbox.path(), &sandbox)
            .args(["--config", "missing.yaml"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("GITHUB_TOKEN"))
            .stderr(predicate::str::contains("config not found").not());
    }
}

#[test]
fn usage_errors_exit_one_for_fleet_tools() {
    let sandbox = TempDir::new().unwrap();
    isolated("migrate-fleet", sandbox.path(), &sandbox)
        .arg("--no-such-flag")
        .assert()
        .code(1);
}

#[test]
fn token_is_read_from_dotenv() {
    let sandbox = TempDir::new().unwrap();
    let cwd = sandbox.path().join("work");
    fs::create_dir_all(&cwd).unwrap();
    fs::write(
        cwd.join(".env"),
        "GITHUB_TOKEN=from-dotenv\nGITHUB_API_URL=http://127.0.0.1:9\n",
    )
    .unwrap();

    // Gets past the token check and fails on the unreachable API instead.
    isolated("scan-repos", &cwd, &sandbox)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("repository scan failed"))
        .stderr(predicate::str::contains("GITHUB_TOKEN").not());
}

#[test]
fn fleet_scan_failure_exits_one() {
    let sandbox = TempDir::new().unwrap();
    isolated("migrate-fleet", sandbox.path(), &sandbox)
        .env("GITHUB_TOKEN", "test-token")
        .env("GITHUB_API_URL", "http://127.0.0.1:9")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Dry-run mode: pass --apply to perform migrations.",
        ))
        .stderr(predicate::str::contains("fleet run aborted"));
}
