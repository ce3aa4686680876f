//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pagegrade");
    cmd.env_remove("OPENAI_API_KEY").env_remove("PAGEGRADE_BASE_URL").env_remove("PAGEGRADE_MODEL");
    cmd
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

#[test]
fn test_cli_extract_only_text() {
    cmd()
        .args(["--extract-only", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Rust lernen in zehn Schritten"))
        .stdout(predicate::str::contains("Ownership-Modell"))
        .stdout(predicate::str::contains("Newsletter").not());
}

#[test]
fn test_cli_extract_only_json() {
    let output = cmd()
        .args(["--extract-only", "-f", "json", &get_fixture_path("article.html")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["title"], "Rust lernen in zehn Schritten");
    assert_eq!(value["previewImageUrl"], "/assets/rust-lernen.png");
    assert!(value["wordCount"].as_u64().unwrap() > 20);
    assert!(value["bodyText"].as_str().unwrap().contains("Besitzer"));
}

#[test]
fn test_cli_extract_only_stdin() {
    cmd()
        .args(["--extract-only", "-"])
        .write_stdin("<h1>Test</h1><p>word word word word word.</p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("word word word word word."));
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("sample.json");

    cmd()
        .args(["--extract-only", "-f", "json", "-o", output.to_str().unwrap()])
        .arg(get_fixture_path("article.html"))
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"wordCount\""));
}

#[test]
fn test_cli_missing_api_key() {
    cmd()
        .args(["-k", "Rust lernen", &get_fixture_path("article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_cli_missing_api_key_skips_fetch() {
    // The port is never contacted: configuration is checked first.
    cmd()
        .arg("http://127.0.0.1:9/page")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"))
        .stderr(predicate::str::contains("Failed to fetch").not());
}

#[test]
fn test_cli_empty_content() {
    cmd()
        .env("OPENAI_API_KEY", "test-key")
        .env("PAGEGRADE_BASE_URL", "http://127.0.0.1:9")
        .arg(get_fixture_path("empty_content.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No readable text"));
}

#[test]
fn test_cli_unreachable_provider() {
    cmd()
        .env("OPENAI_API_KEY", "test-key")
        .env("PAGEGRADE_BASE_URL", "http://127.0.0.1:9")
        .args(["--no-sentiment", "--pass-timeout", "5", &get_fixture_path("article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Analysis failed"));
}

#[test]
fn test_cli_invalid_file() {
    cmd().args(["--extract-only", "nonexistent.html"]).assert().failure();
}

#[test]
fn test_cli_invalid_format() {
    cmd()
        .args(["--extract-only", "-f", "markdown", &get_fixture_path("article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--keyphrase"))
        .stdout(predicate::str::contains("--extract-only"));
}
