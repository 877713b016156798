//! Binary tests; every run gets its own data directory

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn nodebudget(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("nodebudget").unwrap();
    cmd.env("NODEBUDGET_DATA_DIR", dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn init(dir: &TempDir, amount: &str) {
    nodebudget(dir).args(["init", amount]).assert().success();
}

#[test]
fn no_command_prints_usage_hint() {
    let dir = TempDir::new().unwrap();
    nodebudget(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("nodebudget init <amount>"));
}

#[test]
fn init_creates_default_partition() {
    let dir = TempDir::new().unwrap();
    nodebudget(&dir)
        .args(["init", "10000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Investment"))
        .stdout(predicate::str::contains("₹2000.00"))
        .stdout(predicate::str::contains("₹3000.00"))
        .stdout(predicate::str::contains("₹5000.00"));

    assert!(dir.path().join("data").join("budgets.json").exists());
    assert!(dir.path().join("config.json").exists());
}

#[test]
fn init_twice_fails() {
    let dir = TempDir::new().unwrap();
    init(&dir, "10000");

    nodebudget(&dir)
        .args(["init", "500"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already active"));
}

#[test]
fn init_rejects_non_positive_total() {
    let dir = TempDir::new().unwrap();
    nodebudget(&dir)
        .args(["init", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than zero"));
}

#[test]
fn oversized_amounts_are_rejected() {
    let dir = TempDir::new().unwrap();
    nodebudget(&dir)
        .args(["init", "90000000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds the maximum"));

    init(&dir, "100");
    nodebudget(&dir)
        .args(["expense", "add", "Island", "90000000000000000", "--node", "Needs", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds the maximum"));
}

#[test]
fn commands_need_a_budget() {
    let dir = TempDir::new().unwrap();
    nodebudget(&dir)
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active budget"));
}

#[test]
fn over_budget_expense_declined_without_confirmation() {
    let dir = TempDir::new().unwrap();
    init(&dir, "10000");

    nodebudget(&dir)
        .args(["expense", "add", "Laptop", "6000", "--node", "Needs"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("exceeds its allocation"))
        .stdout(predicate::str::contains("Not recorded."));

    nodebudget(&dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses found."));
}

#[test]
fn over_budget_expense_recorded_with_yes() {
    let dir = TempDir::new().unwrap();
    init(&dir, "10000");

    nodebudget(&dir)
        .args(["expense", "add", "Rent", "2500", "--node", "needs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Needs remaining: ₹2500.00"));

    nodebudget(&dir)
        .args(["expense", "add", "Laptop", "3000", "--node", "Needs", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Needs remaining: -₹500.00"));

    nodebudget(&dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("OVER"));
}

#[test]
fn selection_is_remembered_between_runs() {
    let dir = TempDir::new().unwrap();
    init(&dir, "1000");

    nodebudget(&dir)
        .args(["select", "Wants"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected: Wants"));

    nodebudget(&dir)
        .args(["expense", "add", "Cinema", "12.50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wants remaining: ₹287.50"));
}

#[test]
fn node_edit_validates_and_replaces() {
    let dir = TempDir::new().unwrap();
    init(&dir, "10000");

    nodebudget(&dir)
        .args(["node", "edit", "--set", "Save=60", "--set", "Spend=39.98"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("99.98%"));

    nodebudget(&dir)
        .args(["node", "edit", "--set", "Save=60", "--set", "Spend=40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("₹6000.00"))
        .stdout(predicate::str::contains("₹4000.00"));

    nodebudget(&dir)
        .args(["node", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Save"))
        .stdout(predicate::str::contains("Needs").not());
}

#[test]
fn orphans_can_be_pruned() {
    let dir = TempDir::new().unwrap();
    init(&dir, "1000");

    nodebudget(&dir)
        .args(["expense", "add", "Rent", "100", "--node", "Needs"])
        .assert()
        .success();

    nodebudget(&dir)
        .args(["node", "edit", "--set", "All=100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 expense(s) belonged to the replaced nodes"));

    nodebudget(&dir)
        .args(["expense", "prune-orphans"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 orphaned expense(s)"));

    nodebudget(&dir)
        .args(["expense", "prune-orphans"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No orphaned expenses."));
}

#[test]
fn graph_as_json() {
    let dir = TempDir::new().unwrap();
    init(&dir, "100");

    nodebudget(&dir)
        .args(["graph", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hub\""))
        .stdout(predicate::str::contains("Needs (50%) ₹50.00"));

    nodebudget(&dir)
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("₹100.00"));
}

#[test]
fn expense_delete_by_short_id() {
    let dir = TempDir::new().unwrap();
    init(&dir, "100");

    let output = nodebudget(&dir)
        .args(["expense", "add", "Tea", "2", "--node", "Wants"])
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let id = stdout
        .lines()
        .find_map(|l| l.trim().strip_prefix("ID: "))
        .unwrap()
        .to_string();

    nodebudget(&dir)
        .args(["expense", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted expense 'Tea'"));

    nodebudget(&dir)
        .args(["expense", "delete", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn history_lists_audited_changes() {
    let dir = TempDir::new().unwrap();
    init(&dir, "100");

    nodebudget(&dir)
        .args(["expense", "add", "Tea", "2", "--node", "Wants"])
        .assert()
        .success();

    nodebudget(&dir)
        .args(["history", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE Expense"))
        .stdout(predicate::str::contains("(Tea)"));
}

#[test]
fn config_shows_paths() {
    let dir = TempDir::new().unwrap();
    nodebudget(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Currency symbol: ₹"))
        .stdout(predicate::str::contains("Needs 50%"))
        .stdout(predicate::str::contains("No active budget."));
}
