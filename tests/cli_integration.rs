use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

/// Nothing listens here, so any request fails fast with a connection error.
const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

const ENV_VARS: [&str; 8] = [
    "CFL_URL",
    "CFL_EMAIL",
    "CFL_API_TOKEN",
    "CFL_DEFAULT_SPACE",
    "ATLASSIAN_URL",
    "ATLASSIAN_EMAIL",
    "ATLASSIAN_API_TOKEN",
    "ATLASSIAN_DEFAULT_SPACE",
];

/// A `cfl` command isolated from the host's config and environment.
fn cfl(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cfl").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG")
        .env("CFL_CONFIG_DIR", config_dir)
        .env("NO_COLOR", "1");
    cmd
}

/// Like [`cfl`], with credentials pointing at an unreachable server.
fn configured_cfl(config_dir: &Path) -> Command {
    let mut cmd = cfl(config_dir);
    cmd.env("CFL_URL", UNREACHABLE_URL)
        .env("CFL_EMAIL", "me@example.com")
        .env("CFL_API_TOKEN", "token-1234");
    cmd
}

#[test]
fn test_empty_search_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    configured_cfl(temp_dir.path())
        .arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to search for"));
}

#[test]
fn test_unknown_content_type_names_allowed_values() {
    let temp_dir = tempfile::tempdir().unwrap();
    configured_cfl(temp_dir.path())
        .args(["search", "deploy", "--type", "invalid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page, blogpost, attachment, comment"));
}

#[test]
fn test_negative_limit_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    configured_cfl(temp_dir.path())
        .args(["search", "deploy", "--limit", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit must not be negative"));
}

#[test]
fn test_search_validation_precedes_configuration() {
    let temp_dir = tempfile::tempdir().unwrap();
    cfl(temp_dir.path())
        .args(["search", "--type", "wiki"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wiki"))
        .stderr(predicate::str::contains("missing configuration").not());
}

#[test]
fn test_zero_limit_succeeds_without_network() {
    let temp_dir = tempfile::tempdir().unwrap();
    configured_cfl(temp_dir.path())
        .args(["search", "deploy", "--limit", "0", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_unreachable_server_reports_operation() {
    let temp_dir = tempfile::tempdir().unwrap();
    configured_cfl(temp_dir.path())
        .args(["space", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: listing spaces failed"));
}

#[test]
fn test_missing_configuration_is_reported() {
    let temp_dir = tempfile::tempdir().unwrap();
    cfl(temp_dir.path())
        .args(["space", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing configuration: url, email, api-token"));
}

#[test]
fn test_delete_without_force_refuses_when_not_interactive() {
    let temp_dir = tempfile::tempdir().unwrap();
    configured_cfl(temp_dir.path())
        .args(["page", "delete", "12345"])
        .write_stdin("y\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_completion_bash() {
    let temp_dir = tempfile::tempdir().unwrap();
    cfl(temp_dir.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cfl"));
}

#[test]
fn test_init_then_config_get() {
    let temp_dir = tempfile::tempdir().unwrap();
    cfl(temp_dir.path())
        .args([
            "init",
            "--url",
            "https://acme.atlassian.net/",
            "--email",
            "me@acme.com",
            "--api-token",
            "secret-token",
            "--default-space",
            "DEV",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration saved"));

    assert!(temp_dir.path().join("config.json").exists());

    cfl(temp_dir.path())
        .args(["config", "get", "url"])
        .assert()
        .success()
        .stdout("https://acme.atlassian.net\n");

    cfl(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****oken"))
        .stdout(predicate::str::contains("secret-token").not());
}

#[test]
fn test_init_rejects_missing_values() {
    let temp_dir = tempfile::tempdir().unwrap();
    cfl(temp_dir.path())
        .args(["init", "--url", "", "--email", "me@acme.com", "--api-token", "t"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("url"));

    assert!(!temp_dir.path().join("config.json").exists());
}

#[test]
fn test_config_set_and_env_override() {
    let temp_dir = tempfile::tempdir().unwrap();
    cfl(temp_dir.path())
        .args(["config", "set", "default-space", "OPS"])
        .assert()
        .success();

    cfl(temp_dir.path())
        .env("CFL_DEFAULT_SPACE", "ENV")
        .args(["config", "get", "default-space"])
        .assert()
        .success()
        .stdout("ENV\n");

    cfl(temp_dir.path())
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn test_config_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    let expected = temp_dir.path().join("config.json");
    cfl(temp_dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
}
