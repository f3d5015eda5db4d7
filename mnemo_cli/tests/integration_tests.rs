//! Integration tests for the mnemo binary.
//!
//! These tests verify end-to-end behavior including:
//! - Adding cards and listing the deck
//! - Scripted review sessions and scheduling updates
//! - Statistics output
//! - CSV export of the daily rollup

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("mnemo"))
}

fn add_card(data_dir: &std::path::Path, front: &str, back: &str, tags: &[&str]) {
    let mut cmd = cli();
    cmd.arg("add")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--front")
        .arg(front)
        .arg("--back")
        .arg(back);
    for tag in tags {
        cmd.arg("--tag").arg(tag);
    }
    cmd.assert().success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Spaced repetition study system"));
}

#[test]
fn test_add_creates_deck_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("add")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--front")
        .arg("What is ownership?")
        .arg("--back")
        .arg("Each value has a single owner")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added card"));

    let deck_content =
        fs::read_to_string(data_dir.join("deck.json")).expect("Failed to read deck");
    assert!(deck_content.contains("What is ownership?"));
}

#[test]
fn test_list_shows_added_cards() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    add_card(&data_dir, "front one", "back one", &["rust"]);
    add_card(&data_dir, "front two", "back two", &[]);

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("front one"))
        .stdout(predicate::str::contains("front two"));
}

#[test]
fn test_list_filters_by_tag() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    add_card(&data_dir, "tagged card", "back", &["rust"]);
    add_card(&data_dir, "other card", "back", &["math"]);

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--tag")
        .arg("rust")
        .assert()
        .success()
        .stdout(predicate::str::contains("tagged card"))
        .stdout(predicate::str::contains("other card").not());
}

#[test]
fn test_list_search() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    add_card(&data_dir, "Borrow checker", "Ownership rules", &[]);
    add_card(&data_dir, "Algebra", "Numbers", &[]);

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--search")
        .arg("borrow")
        .assert()
        .success()
        .stdout(predicate::str::contains("Borrow checker"))
        .stdout(predicate::str::contains("Algebra").not());
}

#[test]
fn test_review_empty_deck() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("review")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("add some cards first"));
}

#[test]
fn test_scripted_review_updates_schedule() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    add_card(&data_dir, "front", "back", &[]);

    cli()
        .arg("review")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--yes-quality")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains("SESSION COMPLETE"));

    let deck: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(data_dir.join("deck.json")).expect("Failed to read deck"),
    )
    .expect("Deck is not valid JSON");

    let card = &deck["cards"][0];
    assert_eq!(card["repetition_count"], 1);
    assert_eq!(card["interval_days"], 1);
    assert!(card["next_review_at"].is_string());
    assert_eq!(card["history"].as_array().map(|h| h.len()), Some(1));
}

#[test]
fn test_review_appends_to_journal() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    add_card(&data_dir, "front", "back", &[]);

    cli()
        .arg("review")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--yes-quality")
        .arg("3")
        .assert()
        .success();

    let journal_content =
        fs::read_to_string(data_dir.join("journal/reviews.jsonl")).expect("No journal written");
    assert_eq!(journal_content.lines().count(), 1);
    assert!(journal_content.contains("\"quality\":3"));
}

#[test]
fn test_review_rejects_invalid_preset_grade() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    add_card(&data_dir, "front", "back", &[]);

    cli()
        .arg("review")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--yes-quality")
        .arg("9")
        .assert()
        .failure();
}

#[test]
fn test_reviewed_card_is_no_longer_due() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    add_card(&data_dir, "front", "back", &[]);

    cli()
        .arg("review")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--yes-quality")
        .arg("4")
        .assert()
        .success();

    // The card moved a day out, so a second session has nothing to show.
    cli()
        .arg("review")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--yes-quality")
        .arg("4")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing is due"));
}

#[test]
fn test_stats_output() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    add_card(&data_dir, "one", "back", &[]);
    add_card(&data_dir, "two", "back", &[]);

    cli()
        .arg("review")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--yes-quality")
        .arg("5")
        .assert()
        .success();

    cli()
        .arg("stats")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total cards:    2"))
        .stdout(predicate::str::contains("Accuracy:       100.0%"))
        .stdout(predicate::str::contains("Day streak:     1"));
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let csv_path = temp_dir.path().join("progress.csv");

    add_card(&data_dir, "front", "back", &[]);

    cli()
        .arg("review")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--yes-quality")
        .arg("2")
        .assert()
        .success();

    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--output")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 days"));

    let csv_content = fs::read_to_string(&csv_path).expect("No CSV written");
    assert!(csv_content.starts_with("date,reviewed,correct,streak"));
    assert!(csv_content.contains(",1,0,0"));
}

#[test]
fn test_corrupt_deck_is_reported() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("deck.json"), "{ not json").unwrap();

    cli()
        .arg("stats")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure();
}
