//! CLI contract tests.

use assert_cmd::Command;

/// Binary isolated from the user's config, credentials, and API keys.
fn kampania(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kampania").expect("binary should build");
    cmd.env("HOME", home.path())
        .env("KAMPANIA_REMOTE_ENABLED", "false")
        .env("RUST_LOG", "off")
        .env_remove("KAMPANIA_CONFIG_PATH")
        .env_remove("OPENAI_API_KEY")
        .env_remove("ANTHROPIC_API_KEY");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let assert = cmd.assert().success();
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

#[test]
fn interpret_prints_message() {
    let home = tempfile::tempdir().expect("should create temp dir");
    let stdout = stdout_of(kampania(&home).args([
        "interpret",
        "создай кампанию для Меты с оффером Финансы для России",
    ]));
    assert_eq!(stdout.trim(), "Создана 1 кампания.");
}

#[test]
fn interpret_json_output() {
    let home = tempfile::tempdir().expect("should create temp dir");
    let stdout = stdout_of(kampania(&home).args([
        "interpret",
        "--local",
        "--json",
        "--records",
        "2",
        "измени РК на РК-005",
    ]));

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");
    assert_eq!(json["kind"], "bulkUpdate");
    assert_eq!(json["command"]["field"], "rk");
    assert_eq!(json["command"]["value"], "РК-005");
    assert_eq!(json["message"], "Изменил РК на \"РК-005\" для 2 кампаний");
}

#[test]
fn interpret_with_missing_config_fails() {
    let home = tempfile::tempdir().expect("should create temp dir");
    kampania(&home)
        .args(["interpret", "--config"])
        .arg(home.path().join("absent.toml"))
        .arg("оффер Крипто")
        .assert()
        .failure();
}

#[test]
fn vocab_prints_single_field() {
    let home = tempfile::tempdir().expect("should create temp dir");
    let stdout = stdout_of(kampania(&home).args(["vocab", "--field", "offer"]));
    assert!(stdout.starts_with("Оффер (offer)"));
    assert!(stdout.contains("Гемблинг"));
    assert!(!stdout.contains("Страна"));
}

#[test]
fn vocab_rejects_unknown_field() {
    let home = tempfile::tempdir().expect("should create temp dir");
    kampania(&home)
        .args(["vocab", "--field", "budget"])
        .assert()
        .failure();
}

#[test]
fn chat_applies_messages_in_order() {
    let home = tempfile::tempdir().expect("should create temp dir");
    let stdout = stdout_of(
        kampania(&home)
            .args(["chat", "--local"])
            .write_stdin("Мета, офферы Крипто и Нутра, США\n\nизмени РК на РК-004\n/list\n"),
    );

    assert!(stdout.contains("Создано 2 кампании."));
    assert!(stdout.contains("Изменил РК на \"РК-004\" для 2 кампаний"));
    assert!(stdout.contains("1. Мета - Крипто - США | РК: РК-004 | Пиксель: Facebook Pixel"));
    assert!(stdout.contains("2. Мета - Нутра - США | РК: РК-004"));
}
