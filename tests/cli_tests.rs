use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::{tempdir, TempDir};

fn mbf_cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mbf_cli").unwrap();
    cmd.env("MONTHLY_BUDGET_HOME", home).env("NO_COLOR", "1");
    cmd
}

/// A fresh home directory and a new ledger with a 500 budget inside it.
fn new_ledger() -> (TempDir, String) {
    let temp = tempdir().unwrap();
    let file = temp.path().join("may").display().to_string();
    mbf_cli(temp.path())
        .args(["new", &file, "500"])
        .assert()
        .success()
        .stdout(contains("Created"));
    (temp, format!("{file}.mbf"))
}

#[test]
fn new_then_summary() {
    let (home, file) = new_ledger();
    mbf_cli(home.path())
        .args(["summary", &file])
        .assert()
        .success()
        .stdout(contains("Budget:    500.00"))
        .stdout(contains("Remaining: 500.00"));
}

#[test]
fn added_rows_show_in_category_and_daily_totals() {
    let (home, file) = new_ledger();
    mbf_cli(home.path())
        .args(["add", &file, "variable", "May 4", "Food", "Dinner", "-12"])
        .assert()
        .success()
        .stdout(contains("Saved"));

    mbf_cli(home.path())
        .args(["categories", &file])
        .assert()
        .success()
        .stdout(contains("Food"))
        .stdout(contains("-12.00"))
        .stdout(contains("+488.00"));

    mbf_cli(home.path())
        .args(["daily", &file, "Food", "variable"])
        .assert()
        .success()
        .stdout(contains(" 4  -12.00"))
        .stdout(contains("Total: -12.00"));

    let saved = fs::read_to_string(&file).unwrap();
    assert!(saved.ends_with("variable\tMay 4\tFood\tDinner\t-12\n"));
}

#[test]
fn unknown_category_gets_a_suggestion() {
    let (home, file) = new_ledger();
    mbf_cli(home.path())
        .args(["add", &file, "fixed", "May 1", "Fod", "Lunch", "-3"])
        .assert()
        .failure()
        .stderr(contains("did you mean `Food`?"));
}

#[test]
fn unknown_command_gets_a_suggestion() {
    let home = tempdir().unwrap();
    mbf_cli(home.path())
        .arg("sumary")
        .assert()
        .failure()
        .stderr(contains("did you mean `summary`?"));
}

#[test]
fn remove_out_of_range_fails_without_touching_file() {
    let (home, file) = new_ledger();
    let before = fs::read_to_string(&file).unwrap();
    mbf_cli(home.path())
        .args(["remove", &file, "fixed", "3"])
        .assert()
        .failure()
        .stderr(contains("out of range"));
    assert_eq!(fs::read_to_string(&file).unwrap(), before);
}

#[test]
fn category_add_and_sort_persist() {
    let (home, file) = new_ledger();
    mbf_cli(home.path())
        .args(["category-add", &file, "Travel"])
        .assert()
        .success();
    for (name, amount) in [("Train", "-30"), ("Bus", "-4")] {
        mbf_cli(home.path())
            .args(["add", &file, "variable", "May 2", "Travel", name, amount])
            .assert()
            .success();
    }
    mbf_cli(home.path())
        .args(["sort", &file, "variable", "money"])
        .assert()
        .success();

    let saved = fs::read_to_string(&file).unwrap();
    let rows: Vec<_> = saved.lines().skip(2).collect();
    assert_eq!(
        rows,
        [
            "variable\tMay 2\tTravel\tTrain\t-30",
            "variable\tMay 2\tTravel\tBus\t-4",
        ]
    );
    assert!(saved.lines().nth(1).unwrap().ends_with("Travel\t"));
}

#[test]
fn opening_records_last_file_in_config() {
    let (home, file) = new_ledger();
    mbf_cli(home.path())
        .args(["rows", &file])
        .assert()
        .success()
        .stdout(contains("No rows."));
    let config = fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(config.contains("last_opened"));
    assert!(config.contains("may.mbf"));
}

#[test]
fn version_prints_build_metadata() {
    let home = tempdir().unwrap();
    mbf_cli(home.path())
        .arg("version")
        .assert()
        .success()
        .stdout(contains("monthly_budget"));
}

#[test]
fn add_rejects_line_breaks_in_fields() {
    let (home, file) = new_ledger();
    let before = fs::read_to_string(&file).unwrap();
    mbf_cli(home.path())
        .args(["add", &file, "variable", "May 2", "Food", "Lunch\nextra", "-10"])
        .assert()
        .failure()
        .stderr(contains("line break"));
    assert_eq!(fs::read_to_string(&file).unwrap(), before);
}
