//! CLI contract tests for `basketforge`

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;

fn basketforge() -> assert_cmd::Command {
    cargo_bin_cmd!("basketforge")
}

fn write_baskets(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("baskets.txt");
    fs::write(&path, "milk,bread\nmilk,bread,eggs\nbread,eggs\n").expect("write baskets");
    path
}

#[test]
fn recommends_bread_for_milk() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_baskets(tmp.path());

    basketforge()
        .args([
            "--input",
            input.to_str().unwrap(),
            "--format",
            "lines",
            "--min-support",
            "0.3",
            "--min-confidence",
            "0.5",
            "--query",
            "Milk",
            "-n",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dataset loaded: 3 baskets, 3 unique items"))
        .stdout(predicate::str::contains(
            "Maybe you would also like to purchase bread",
        ))
        .stdout(predicate::str::contains("1. bread (confidence: 1.0000"));
}

#[test]
fn unknown_query_item_is_not_an_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_baskets(tmp.path());

    basketforge()
        .args([
            "--input",
            input.to_str().unwrap(),
            "--format",
            "lines",
            "--min-support",
            "0.3",
            "--query",
            "caviar",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Items not found in dataset: caviar"))
        .stdout(predicate::str::contains(
            "Available items include: bread, eggs, milk",
        ))
        .stdout(predicate::str::contains(
            "No recommendation available for the given item set.",
        ));
}

#[test]
fn blank_query_asks_for_an_item() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_baskets(tmp.path());

    basketforge()
        .args([
            "--input",
            input.to_str().unwrap(),
            "--format",
            "lines",
            "--min-support",
            "0.3",
            "--query",
            " , ,",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Please enter at least one item."))
        .stdout(predicate::str::contains("Recommendations for").not());
}

#[test]
fn lists_top_rules_by_confidence() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_baskets(tmp.path());

    basketforge()
        .args([
            "--input",
            input.to_str().unwrap(),
            "--format",
            "lines",
            "--min-support",
            "0.3",
            "--show-rules",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "=== Top 1 Association Rules (by confidence) ===",
        ))
        .stdout(predicate::str::contains("confidence: 100.00%"));
}

#[test]
fn custom_item_column() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("sales.csv");
    fs::write(
        &input,
        "customer,day,product
1,d1,milk
1,d1,bread
2,d2,bread
2,d2,eggs
",
    )
    .expect("write sales");

    basketforge()
        .args([
            "--input",
            input.to_str().unwrap(),
            "--member-column",
            "customer",
            "--date-column",
            "day",
            "--item-column",
            "product",
            "--min-support",
            "0.3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dataset loaded: 2 baskets, 3 unique items"));
}

#[test]
fn exports_rules_csv() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_baskets(tmp.path());
    let export = tmp.path().join("rules.csv");

    basketforge()
        .args([
            "--input",
            input.to_str().unwrap(),
            "--format",
            "lines",
            "--min-support",
            "0.3",
            "--export",
            export.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rules saved to:"));

    let content = fs::read_to_string(&export).expect("read export");
    assert!(content.starts_with("antecedents,consequents,"));
    // Header plus 12 rules
    assert_eq!(content.lines().count(), 13);
}

#[test]
fn missing_input_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let missing = tmp.path().join("nope.csv");

    basketforge()
        .args(["--input", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn empty_basket_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("baskets.txt");
    fs::write(&input, "milk,bread\n , \n").expect("write baskets");

    basketforge()
        .args(["--input", input.to_str().unwrap(), "--format", "lines"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty basket on line 2"));
}

#[test]
fn invalid_threshold_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = write_baskets(tmp.path());

    basketforge()
        .args([
            "--input",
            input.to_str().unwrap(),
            "--format",
            "lines",
            "--min-confidence",
            "1.5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid min_confidence"));
}
