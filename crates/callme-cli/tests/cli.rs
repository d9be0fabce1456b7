use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn config_file(dir: &TempDir, contents: &str) -> String {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write config");
    path_str(&path)
}

fn path_str(path: &Path) -> String {
    path.to_str().expect("config path").to_string()
}

fn empty_config() -> (TempDir, String) {
    let temp = TempDir::new().expect("temp dir");
    let path = config_file(&temp, "");
    (temp, path)
}

#[test]
fn phone_formats_each_argument() {
    let output = cargo_bin_cmd!("callme")
        .args(["phone", "89991234567", "8", "+7 (999"])
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["+7 (999) 123-45-67", "+7", "+7 (999)"]);
}

#[test]
fn phone_json_reports_digits() {
    let output = cargo_bin_cmd!("callme")
        .args(["--json", "phone", "799912345678899"])
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    let value: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(value[0]["digits"], "79991234567");
    assert_eq!(value[0]["formatted"], "+7 (999) 123-45-67");
}

#[test]
fn validate_accepts_complete_submission() {
    let (_temp, config) = empty_config();
    let output = cargo_bin_cmd!("callme")
        .args(["--config", &config, "validate"])
        .args(["--name", "Ada Lovelace", "--email", "ada@example.com"])
        .args(["--phone", "89991234567", "--topic", "Консультация"])
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout.trim(), "Форма успешно отправлена!");
}

#[test]
fn validate_reports_annotations_and_exits_with_invalid_input() {
    let (_temp, config) = empty_config();
    let output = cargo_bin_cmd!("callme")
        .args(["--config", &config, "validate"])
        .args(["--name", "Ada", "--email", "ada@", "--phone", "8999"])
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("email-error: Введите корректный email"));
    assert!(stdout.contains("phone-error: Неверный формат"));
    assert!(stdout.contains("topic-error: Это поле обязательно"));
    assert!(!stdout.contains("name-error"));
}

#[test]
fn validate_json_uses_configured_messages() {
    let temp = TempDir::new().expect("temp dir");
    let config = config_file(&temp, "[messages]\nrequired = \"Required\"\n");
    let output = cargo_bin_cmd!("callme")
        .args(["--config", &config, "--json", "validate", "--phone", "8 999"])
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(3));
    let value: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(value["valid"], false);
    assert_eq!(value["values"]["phone"], "+7 (999)");
    let violations = value["violations"].as_array().expect("violations");
    assert_eq!(violations[0]["error_id"], "name-error");
    assert_eq!(violations[0]["violation"], "required");
    assert_eq!(violations[0]["message"], "Required");
}

#[test]
fn missing_explicit_config_is_invalid_input() {
    let temp = TempDir::new().expect("temp dir");
    let missing = path_str(&temp.path().join("nope.toml"));
    let output = cargo_bin_cmd!("callme")
        .args(["--config", &missing, "-v", "validate"])
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("config file not found"));
}

#[test]
fn completions_are_generated() {
    let output = cargo_bin_cmd!("callme")
        .args(["completions", "bash"])
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("callme"));
}
