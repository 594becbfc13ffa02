use std::fs;
use std::process::Command;

#[test]
fn stats_report_skipped_lines_through_tracing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bets.jsonl");
    fs::write(
        &path,
        concat!(
            r#"{"ts":"2024-06-10T12:00:00Z","event":"BET_OUTCOME","player":"Derke","line":20.5,"predicted":24.1,"actual":26,"side":"OVER","result":"WIN"}"#,
            "\n",
            "not json\n",
        ),
    )
    .unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_bet-log-stats"))
        .env("PROPS_BET_LOG", &path)
        .env("RUST_LOG", "warn")
        .env("NO_COLOR", "1")
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("all: total=1 wins=1 losses=0 pushes=0 hit_rate=100.0%"));
    assert!(stdout.contains("skipped_lines: 1"));
    assert!(stdout.contains("bet log line 2 skipped"));
}
