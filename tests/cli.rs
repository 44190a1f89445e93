//! Tests for the aml binary

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const STORY: &str = "headline: Hello\n[tags]\n* news\n* local\n";

fn story_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(STORY.as_bytes()).unwrap();
    file
}

/// The binary with no per-user configuration in reach.
fn aml() -> Command {
    let mut cmd = cargo_bin_cmd!("aml");
    cmd.env("XDG_CONFIG_HOME", "/nonexistent/aml-config");
    cmd
}

#[test]
fn test_file_to_pretty_json() {
    let file = story_file();
    aml()
        .arg(file.path())
        .assert()
        .success()
        .stdout("{\n  \"headline\": \"Hello\",\n  \"tags\": [\n    \"news\",\n    \"local\"\n  ]\n}\n");
}

#[test]
fn test_compact_json() {
    let file = story_file();
    aml()
        .arg(file.path())
        .arg("--compact")
        .assert()
        .success()
        .stdout("{\"headline\":\"Hello\",\"tags\":[\"news\",\"local\"]}\n");
}

#[test]
fn test_stream_to_yaml() {
    aml()
        .args(["--stream", "--format", "yaml"])
        .write_stdin(STORY)
        .assert()
        .success()
        .stdout("headline: Hello\ntags:\n- news\n- local\n");
}

#[test]
fn test_xml_output() {
    aml()
        .args(["-s", "-f", "xml", "--compact"])
        .write_stdin(STORY)
        .assert()
        .success()
        .stdout("<root><headline>Hello</headline><tags>news</tags><tags>local</tags></root>\n");
}

#[test]
fn test_config_file_sets_defaults() {
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[output]\nformat = \"xml\"\npretty = false\nxml_root = \"story\"").unwrap();
    aml()
        .arg("--stream")
        .arg("--config")
        .arg(config.path())
        .write_stdin("a: 1")
        .assert()
        .success()
        .stdout("<story><a>1</a></story>\n");
}

#[test]
fn test_flag_overrides_config_file() {
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[output]\nformat = \"xml\"").unwrap();
    aml()
        .args(["--stream", "--compact", "-f", "json"])
        .arg("-c")
        .arg(config.path())
        .write_stdin("a: 1")
        .assert()
        .success()
        .stdout("{\"a\":\"1\"}\n");
}

#[test]
fn test_user_config_file_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("aml.toml"),
        "[output]\nformat = \"XML\"\npretty = false\n",
    )
    .unwrap();
    aml()
        .env("XDG_CONFIG_HOME", dir.path())
        .arg("--stream")
        .write_stdin("a: 1")
        .assert()
        .success()
        .stdout("<root><a>1</a></root>\n");
}

#[test]
fn test_config_flag_overrides_user_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("aml.toml"),
        "[output]\nformat = \"xml\"\npretty = false\nxml_root = \"user\"\n",
    )
    .unwrap();
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[output]\nxml_root = \"story\"").unwrap();
    aml()
        .env("XDG_CONFIG_HOME", dir.path())
        .arg("--stream")
        .arg("--config")
        .arg(config.path())
        .write_stdin("a: 1")
        .assert()
        .success()
        .stdout("<story><a>1</a></story>\n");
}

#[test]
fn test_requires_an_input() {
    aml()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_inputs_are_exclusive() {
    let file = story_file();
    aml()
        .arg(file.path())
        .arg("--stream")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_unknown_format_rejected() {
    aml()
        .args(["--stream", "--format", "toml"])
        .write_stdin("a: 1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown output format"));
}

#[test]
fn test_missing_file_reports_error() {
    aml()
        .arg("/definitely/not/here.aml")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_invalid_gdoc_reference() {
    aml()
        .args(["--gdoc", "http://example.com/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
