use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;
use tempfile::TempDir;

fn script(home: &TempDir, input: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("expense_core_cli").unwrap();
    cmd.env("EXPENSE_CORE_CLI_SCRIPT", "1")
        .env("EXPENSE_CORE_HOME", home.path())
        .env("RUST_LOG", "off")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let input = "\
category add Pets
budget set Pets 50
add \"Vet visit\" 60 Pets
list amount-desc
budget list
split add Dinner 90 \"Alice, Bob, Carol\"
debt add Book 15 i-owe
debt list
exit
";
    script(&home, input)
        .success()
        .stdout(contains("Category `Pets` added."))
        .stdout(contains("Added #1: Vet visit $60.00 [Pets]"))
        .stdout(contains("Total: $60.00"))
        .stdout(contains("[danger]"))
        .stdout(contains("$30.00 each"))
        .stdout(contains("net -$15.00"))
        .stderr(contains("Pets budget at 100%"));

    let stored = std::fs::read_to_string(home.path().join("transactions.json")).unwrap();
    assert!(stored.contains("\"Vet visit\""));
}

#[test]
fn list_rows_show_position_date_and_amount() {
    let home = TempDir::new().unwrap();
    let input = "\
add Coffee 4.5 Food --date 2024-01-03 --time 08:15
add Rent 800 Bills --recurring --date 2024-01-01 --time 09:00
list date-asc
";
    let output = script(&home, input).success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    let row = Regex::new(r"#(\d+)\s+(\d{4}-\d{2}-\d{2}) (\d{2}:\d{2})\s+(\w+)").unwrap();
    let rows: Vec<(String, String)> = row
        .captures_iter(&stdout)
        .map(|caps| (caps[1].to_string(), caps[4].to_string()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("2".to_string(), "Rent".to_string()),
            ("1".to_string(), "Coffee".to_string()),
        ]
    );
    assert!(stdout.contains("(recurring)"));
}

#[test]
fn errors_are_reported_without_aborting() {
    let home = TempDir::new().unwrap();
    let input = "\
lst
delete 3
budget set Food 0
split add Nobody 10 \" , \"
quick Food 12
list
";
    script(&home, input)
        .success()
        .stderr(contains("Unknown command `lst`"))
        .stdout(contains("Did you mean `list`?"))
        .stderr(contains("No entry #3"))
        .stderr(contains("Invalid amount"))
        .stderr(contains("at least one participant"))
        .stdout(contains("Quick Add - Food"));
}

#[test]
fn data_persists_between_runs_and_restore_rejects_bad_files() {
    let home = TempDir::new().unwrap();
    script(&home, "quick Transport 3.25\n").success();

    let export = home.path().join("export.json");
    script(&home, &format!("export {}\n", export.display()))
        .success()
        .stdout(contains("Exported all data"));
    let exported = std::fs::read_to_string(&export).unwrap();
    assert!(exported.contains("Quick Add - Transport"));

    let bad = home.path().join("bad.json");
    std::fs::write(&bad, "{ nope").unwrap();
    script(&home, &format!("restore {}\nlist\n", bad.display()))
        .success()
        .stderr(contains("Failed to restore data"))
        .stdout(contains("Total: $3.25"));
}

#[test]
fn backups_are_archived_with_notes() {
    let home = TempDir::new().unwrap();
    script(&home, "quick Food 1\nbackup before trip\nbackups\n")
        .success()
        .stdout(contains("Backup saved to"))
        .stdout(contains("(before-trip)"));
    let archived = std::fs::read_dir(home.path().join("backups"))
        .unwrap()
        .count();
    assert_eq!(archived, 1);
}

#[test]
fn theme_and_sort_preferences_persist() {
    let home = TempDir::new().unwrap();
    script(&home, "theme dark\nsort amount-asc\n").success();
    let config = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(config.contains("\"dark\""));
    assert!(config.contains("\"amount-asc\""));

    script(&home, "sort\n")
        .success()
        .stdout(contains("Default order: amount-asc"))
        .stdout(contains("hint:").and(contains("date-desc")));
}
