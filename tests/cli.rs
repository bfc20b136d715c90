use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn bolso(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bolso").unwrap();
    cmd.env("HOME", home);
    cmd.env("NO_COLOR", "1");
    cmd
}

fn init(home: &Path) {
    bolso(home).arg("init").assert().success();
}

fn load_demo(home: &Path, user: &str) {
    bolso(home)
        .args(["demo", "--user", user])
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo data loaded!"));
}

fn store_file(home: &Path, name: &str) -> PathBuf {
    home.join("Documents")
        .join("bolso")
        .join("store")
        .join(name)
}

#[test]
fn init_writes_settings_and_seed_users() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    assert!(home
        .path()
        .join(".config")
        .join("bolso")
        .join("settings.json")
        .exists());

    bolso(home.path())
        .args(["users", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Brenno"))
        .stdout(predicate::str::contains("Lais"))
        .stdout(predicate::str::contains("guest"));
}

#[test]
fn demo_loads_once_and_lists_transactions() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    load_demo(home.path(), "Brenno");

    bolso(home.path())
        .args(["transactions", "list", "--user", "Brenno"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (8)"))
        .stdout(predicate::str::contains("Posto Shell"))
        .stdout(predicate::str::contains("TED Salário Mensal"))
        .stdout(predicate::str::contains("Receita"));

    // Second run is an idempotent no-op.
    bolso(home.path())
        .args(["demo", "--user", "Brenno"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo data already loaded."));
}

#[test]
fn demo_rows_are_recategorized_by_seed_rules() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    load_demo(home.path(), "Brenno");

    // "Posto Shell" matches the seeded "Shell" rule; the marker shows it.
    bolso(home.path())
        .args(["transactions", "list", "--user", "Brenno", "--category", "Transporte"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Posto Shell"))
        .stdout(predicate::str::contains("Transporte *"));
}

#[test]
fn unknown_user_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    bolso(home.path())
        .args(["transactions", "list", "--user", "Ninguem"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown user"));
}

#[test]
fn rules_add_rejects_label_outside_the_fixed_set() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    bolso(home.path())
        .args(["rules", "add", "padaria", "--category", "Groceries", "--user", "Brenno"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}

#[test]
fn rules_add_recategorizes_existing_rows() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    load_demo(home.path(), "Brenno");

    bolso(home.path())
        .args(["rules", "add", "extra", "--category", "Compras", "--user", "Brenno"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added rule"));

    bolso(home.path())
        .args(["transactions", "list", "--user", "Brenno", "--category", "Compras"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Supermercado Extra"));
}

#[test]
fn upload_parses_csv_statement_and_detects_duplicates() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    let statement = home.path().join("extrato_nubank.csv");
    std::fs::write(
        &statement,
        "Extrato Nubank\nData,Descrição,Valor\n24/10/2023,Uber Trip,\"-24,50\"\n01/10/2023,TED Salário,\"3500,00\"\n",
    )
    .unwrap();

    bolso(home.path())
        .args(["upload", statement.to_str().unwrap(), "--user", "Lucas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 transactions imported"))
        .stdout(predicate::str::contains("Nubank"));

    bolso(home.path())
        .args(["transactions", "list", "--user", "Lucas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Uber Trip"))
        .stdout(predicate::str::contains("Transporte *"))
        .stdout(predicate::str::contains("R$ 3.500,00"));

    // Same bytes again: refused by checksum, table unchanged.
    bolso(home.path())
        .args(["upload", statement.to_str().unwrap(), "--user", "Lucas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already been uploaded"));
    bolso(home.path())
        .args(["transactions", "list", "--user", "Lucas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (2)"));
}

#[test]
fn upload_of_unparseable_statement_changes_nothing() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    let junk = home.path().join("rabisco.csv");
    std::fs::write(&junk, "nada,que,sirva\n1,2,3\n").unwrap();
    bolso(home.path())
        .args(["upload", junk.to_str().unwrap(), "--user", "Lucas"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Extraction failed"));

    bolso(home.path())
        .args(["transactions", "list", "--user", "Lucas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (0)"));
}

#[test]
fn guest_sees_titular_data_but_never_persists() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    load_demo(home.path(), "Brenno");

    let raw_path = store_file(home.path(), "raw_brenno.json");
    let before = std::fs::read(&raw_path).unwrap();

    // The guest views the titular account's table...
    bolso(home.path())
        .args(["transactions", "list", "--user", "Luisa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (8)"));

    // ...and may "mutate" it, but only in memory for that invocation.
    bolso(home.path())
        .args(["transactions", "delete", "d1", "--user", "Luisa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted transaction d1."));
    bolso(home.path())
        .args(["rules", "add", "starbucks", "--category", "Lazer", "--user", "Luisa"])
        .assert()
        .success();

    let after = std::fs::read(&raw_path).unwrap();
    assert_eq!(before, after, "guest mutated the titular account's storage");
    bolso(home.path())
        .args(["transactions", "list", "--user", "Brenno"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (8)"))
        .stdout(predicate::str::contains("Posto Shell"));
}

#[test]
fn admin_impersonation_edits_land_in_the_target_account() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    load_demo(home.path(), "Brenno");

    bolso(home.path())
        .args([
            "transactions", "edit", "d5",
            "--category", "Lazer",
            "--user", "Lais",
            "--impersonate", "Brenno",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Admin mode"))
        .stdout(predicate::str::contains("Updated d5"));

    bolso(home.path())
        .args(["transactions", "list", "--user", "Brenno", "--category", "Lazer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Starbucks Coffee"));

    // The admin's own account stayed empty.
    bolso(home.path())
        .args(["transactions", "list", "--user", "Lais"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (0)"));
}

#[test]
fn impersonation_requires_admin_role() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    bolso(home.path())
        .args(["transactions", "list", "--user", "Lucas", "--impersonate", "Brenno"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an admin"));
}

#[test]
fn export_writes_the_localized_csv() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    load_demo(home.path(), "Brenno");

    let out = home.path().join("export.csv");
    bolso(home.path())
        .args(["export", "--user", "Brenno", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("8 transactions exported"));

    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("Data,Descrição,Categoria,Valor,Tipo\n"));
    assert!(content.contains("\"TED Salário Mensal\",Renda,3500.00,Receita"));
    assert!(content.contains("\"Posto Shell\",Transporte,150.00,Despesa"));
}

#[test]
fn file_delete_cascades_to_its_transactions() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    load_demo(home.path(), "Brenno");

    // Without --yes it only explains what would happen.
    bolso(home.path())
        .args(["files", "delete", "demo-file-1", "--user", "Brenno"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes to confirm"));
    bolso(home.path())
        .args(["transactions", "list", "--user", "Brenno"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (8)"));

    bolso(home.path())
        .args(["files", "delete", "demo-file-1", "--user", "Brenno", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 transactions"));

    bolso(home.path())
        .args(["transactions", "list", "--user", "Brenno"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (3)"))
        .stdout(predicate::str::contains("Supermercado Extra"))
        .stdout(predicate::str::contains("Posto Shell").not());
}

#[test]
fn demo_files_cannot_be_redownloaded() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    load_demo(home.path(), "Brenno");
    bolso(home.path())
        .args(["files", "download", "demo-file-1", "--user", "Brenno"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available"));
}

#[test]
fn uploaded_original_can_be_downloaded_back() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());

    let statement = home.path().join("extrato.csv");
    let body = "Data,Descrição,Valor\n24/10/2023,Uber Trip,\"-24,50\"\n";
    std::fs::write(&statement, body).unwrap();
    bolso(home.path())
        .args(["upload", statement.to_str().unwrap(), "--user", "Lucas"])
        .assert()
        .success();

    // Find the file id from the listing, then round-trip the content.
    let listing = bolso(home.path())
        .args(["files", "list", "--user", "Lucas"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let listing = String::from_utf8_lossy(&listing);
    let id = listing
        .split_whitespace()
        .find(|w| w.starts_with("file-"))
        .expect("file id in listing")
        .to_string();

    let out = home.path().join("roundtrip.csv");
    bolso(home.path())
        .args(["files", "download", &id, "--user", "Lucas", "--output", out.to_str().unwrap()])
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), body);
}

#[test]
fn clear_removes_the_stored_tables() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    load_demo(home.path(), "Brenno");
    assert!(store_file(home.path(), "raw_brenno.json").exists());

    bolso(home.path())
        .args(["clear", "--user", "Brenno", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));

    assert!(!store_file(home.path(), "raw_brenno.json").exists());
    assert!(!store_file(home.path(), "rules_brenno.json").exists());
    bolso(home.path())
        .args(["transactions", "list", "--user", "Brenno"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (0)"));
}

#[test]
fn status_reports_table_counts() {
    let home = tempfile::tempdir().unwrap();
    init(home.path());
    load_demo(home.path(), "Brenno");
    bolso(home.path())
        .args(["status", "--user", "Brenno"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Raw transactions:     8"))
        .stdout(predicate::str::contains("Uploaded files:       3"))
        .stdout(predicate::str::contains("Category rules:       7"));
}
