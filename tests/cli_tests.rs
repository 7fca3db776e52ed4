#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("CROP_SEASON_START")
        .env_remove("CROP_SEASON_END")
        .env_remove("CROP_RULE_MODE")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_reports_next_fertilization() {
    run_cli("next 2025-11-10\nquit\n")
        .success()
        .stdout(str_contains("Next fertilization [fert-11-20251123]"));
}

#[test]
fn cli_reports_no_fertilization_after_last_phase() {
    run_cli("next 2026-02-01\nquit\n")
        .success()
        .stdout(str_contains("No upcoming fertilization."));
}

#[test]
fn cli_switches_mode_and_shows_week() {
    run_cli("mode alternate\nweek 11\nquit\n")
        .success()
        .stdout(str_contains("Mode set to alternate"))
        .stdout(str_contains("tc-lavado-10-all-20251116"));
}

#[test]
fn cli_rejects_unknown_plant_filter() {
    run_cli("filter sweet-million\nquit\n")
        .success()
        .stdout(str_contains("Unknown plant 'sweet-million'"));
}

#[test]
fn cli_exports_csv() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    run_cli(&format!("export csv {}\nquit\n", path))
        .success()
        .stdout(str_contains("Season exported to"));
    let contents = std::fs::read_to_string(tmp.path()).unwrap();
    assert!(contents.contains("lavado-18-fresh-candy-20260111"));
}

#[test]
fn cli_loads_plan_file() {
    let tmp = NamedTempFile::new().expect("create temp file");
    std::fs::write(
        tmp.path(),
        r#"{ "season": { "start": "2025-09-04", "end": "2025-10-30" } }"#,
    )
    .unwrap();
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    run_cli(&format!("config load {}\nshow\nquit\n", path))
        .success()
        .stdout(str_contains("Plan loaded from"))
        .stdout(str_contains("weeks=9"));
}

#[test]
fn cli_today_lists_active_wash_and_harvest_windows() {
    run_cli("today 2026-01-10\nquit\n")
        .success()
        .stdout(str_contains("Semana 19"))
        .stdout(str_contains("Lavado: fresh-candy until 2026-01-22"))
        .stdout(str_contains("Cosecha: cream-mandarine until 2026-01-31"));
}

#[test]
fn cli_weeks_count_from_one() {
    run_cli("help\nweek 0\nweek 1\nquit\n")
        .success()
        .stdout(str_contains("counting from 1 (bucket index n-1)"))
        .stdout(str_contains("Invalid week number (weeks count from 1)"))
        .stdout(str_contains("Semana 1 (04 sept - 10 sept 2025) fase germinacion"));
}
