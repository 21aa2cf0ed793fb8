use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("donation_core_cli").unwrap();
    cmd.env("DONATION_CORE_CLI_SCRIPT", "1")
        .env("DONATION_CORE_HOME", home)
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn script_mode_runs_a_month() {
    let home = tempdir().unwrap();
    let input = "\
month-new 2025 5 30
donation-add 2025 5 \"Ko Aung\" 200000 MMK
donation-add 2025 5 Sato 3333 JPY
distribution-add 2025 5 \"Village school\" 100000 - \"exercise books\"
month-new 2025 6 30
month-show 2025 6
exit
";

    cli(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Monthly overview 2025-05 created"))
        .stdout(contains("99,990 MMK"))
        .stdout(contains("199,990 MMK"));

    let ledger = std::fs::read_to_string(home.path().join("data").join("ledger.json")).unwrap();
    assert!(ledger.contains("Ko Aung"));
}

#[test]
fn domain_errors_carry_their_code() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin("month-new 2025 6 30\nmonth-new 2025 6 30\nmonth-show 2030 1\n")
        .assert()
        .success()
        .stderr(contains("[DUPLICATE_MONTH]"))
        .stderr(contains("[MONTH_NOT_FOUND]"));
}

#[test]
fn unknown_command_gets_a_suggestion() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin("month-lst\n")
        .assert()
        .success()
        .stdout(contains("Suggestion: `month-list`?"));
}

#[test]
fn help_lists_commands_by_area() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin("help\nhelp MONTH-SHOW\n")
        .assert()
        .success()
        .stdout(contains("=== Months ==="))
        .stdout(contains("=== Donation places ==="))
        .stdout(contains("=== System ==="))
        .stdout(contains("month-show <year> <month>"));
}

#[test]
fn previous_balance_without_history_is_zero() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin("prev-balance 2025 1\n")
        .assert()
        .success()
        .stdout(contains("Previous month balance: 0 MMK"));
}
