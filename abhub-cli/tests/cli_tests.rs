//! End-to-end tests for the abhub binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command wired to an isolated config and data home.
fn abhub(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("abhub").expect("binary should build");
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"));
    cmd.env("XDG_DATA_HOME", home.path().join("data"));
    cmd.env_remove("ABHUB_DATA_FILE");
    cmd.arg("--no-color");
    cmd
}

fn data_file(home: &TempDir) -> String {
    home.path().join("ideas.json").display().to_string()
}

#[test]
fn sample_size_reference_numbers() {
    let home = TempDir::new().unwrap();
    abhub(&home)
        .args(["sample-size", "-b", "3", "-m", "10", "-t", "5000"])
        .args(["-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"perVariant\": 53152"))
        .stdout(predicate::str::contains("\"total\": 106304"))
        .stdout(predicate::str::contains("\"daysNeeded\": 22"));
}

#[test]
fn sample_size_warns_on_long_tests() {
    let home = TempDir::new().unwrap();
    abhub(&home)
        .args(["sample-size", "-b", "3", "-m", "10", "-t", "3000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("36"))
        .stdout(predicate::str::contains("Consider a larger effect"));
}

#[test]
fn sample_size_rejects_out_of_range_input() {
    let home = TempDir::new().unwrap();
    abhub(&home)
        .args(["sample-size", "-b", "0", "-m", "10", "-t", "5000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn sample_size_rejects_unknown_alpha() {
    let home = TempDir::new().unwrap();
    abhub(&home)
        .args(["sample-size", "-b", "3", "-m", "10", "-t", "5000"])
        .args(["--alpha", "0.2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported significance level"));
}

#[test]
fn significance_reports_the_reference_test() {
    let home = TempDir::new().unwrap();
    abhub(&home)
        .args([
            "significance",
            "--control-visitors",
            "5000",
            "--control-conversions",
            "150",
            "--variant-visitors",
            "5000",
            "--variant-conversions",
            "175",
            "-d",
            "7",
        ])
        .args(["-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"significant\": false"))
        .stdout(predicate::str::contains("\"peeking\": true"));
}

#[test]
fn significance_flags_early_peeking() {
    let home = TempDir::new().unwrap();
    abhub(&home)
        .args([
            "significance",
            "--control-visitors",
            "10000",
            "--control-conversions",
            "300",
            "--variant-visitors",
            "10000",
            "--variant-conversions",
            "400",
            "-d",
            "7",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Significant at alpha 0.05"))
        .stdout(predicate::str::contains("Early peeks"));
}

#[test]
fn significance_rejects_impossible_counts() {
    let home = TempDir::new().unwrap();
    abhub(&home)
        .args([
            "significance",
            "--control-visitors",
            "100",
            "--control-conversions",
            "200",
            "--variant-visitors",
            "100",
            "--variant-conversions",
            "5",
            "-d",
            "14",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn ideas_lifecycle_roundtrip() {
    let home = TempDir::new().unwrap();
    let data = data_file(&home);

    let output = abhub(&home)
        .args([
            "ideas",
            "add",
            "Checkout trust badges",
            "-i",
            "8",
            "-c",
            "7",
            "-e",
            "9",
            "-r",
            "3.5",
            "--improvement",
            "12",
            "--traffic",
            "40000",
        ])
        .args(["--data-file", &data, "-o", "json"])
        .output()
        .expect("add should run");
    assert!(output.status.success());

    let added: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("add should emit json");
    assert_eq!(added["iceScore"], 504);
    assert_eq!(added["status"], "planned");
    let id = added["id"].as_str().expect("id should be a string").to_string();

    abhub(&home)
        .args(["ideas", "list", "--data-file", &data])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checkout trust badges"));

    // A unique prefix is enough to address the idea.
    abhub(&home)
        .args(["ideas", "start", &id[..8], "--data-file", &data])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started test for"));

    abhub(&home)
        .args([
            "ideas", "complete", &id, "-r", "15", "--duration", "21", "--data-file", &data,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed"))
        .stdout(predicate::str::contains("Prediction accuracy: 125.00%"));

    abhub(&home)
        .args(["ideas", "show", &id, "--data-file", &data])
        .assert()
        .success()
        .stdout(predicate::str::contains("Measured uplift: 15.00%"))
        .stdout(predicate::str::contains("Duration (days): 21"));

    abhub(&home)
        .args(["dashboard", "--data-file", &data, "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"completed\": 1"))
        .stdout(predicate::str::contains("\"avgActualUplift\": 15.0"));

    abhub(&home)
        .args(["ideas", "remove", &id, "--force", "--data-file", &data])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed idea"));

    abhub(&home)
        .args(["ideas", "list", "--data-file", &data])
        .assert()
        .success()
        .stdout(predicate::str::contains("No items found."));
}

#[test]
fn complete_requires_a_running_test() {
    let home = TempDir::new().unwrap();
    let data = data_file(&home);

    let output = abhub(&home)
        .args([
            "ideas",
            "add",
            "Sticky add-to-cart",
            "-i",
            "6",
            "-c",
            "6",
            "-e",
            "8",
            "-r",
            "2.4",
            "--improvement",
            "8",
            "--traffic",
            "25000",
        ])
        .args(["--data-file", &data, "-o", "json"])
        .output()
        .expect("add should run");
    assert!(output.status.success());
    let added: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = added["id"].as_str().unwrap().to_string();

    abhub(&home)
        .args(["ideas", "complete", &id, "-r", "5", "--data-file", &data])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot transition"));
}

#[test]
fn add_rejects_out_of_range_scores() {
    let home = TempDir::new().unwrap();
    let data = data_file(&home);

    abhub(&home)
        .args([
            "ideas",
            "add",
            "Impossible idea",
            "-i",
            "11",
            "-c",
            "5",
            "-e",
            "5",
            "-r",
            "3.0",
            "--improvement",
            "10",
            "--traffic",
            "1000",
        ])
        .args(["--data-file", &data])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn principles_reference_card() {
    let home = TempDir::new().unwrap();
    abhub(&home)
        .args(["principles", "social-proof"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Social Proof"))
        .stdout(predicate::str::contains("Show real-time activity"));
}

#[test]
fn segments_catalog_and_detail() {
    let home = TempDir::new().unwrap();
    abhub(&home)
        .args(["segments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1997-2012"))
        .stdout(predicate::str::contains("1946-1964"));

    abhub(&home)
        .args(["segments", "boomer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Baby Boomer"))
        .stdout(predicate::str::contains("Offer a phone number"));
}

#[test]
fn segments_ranked_by_principle() {
    let home = TempDir::new().unwrap();
    abhub(&home)
        .args(["segments", "--principle", "authority"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9/10"))
        .stdout(predicate::str::contains("lands hardest with Baby Boomer"));
}

#[test]
fn config_set_and_show_roundtrip() {
    let home = TempDir::new().unwrap();

    abhub(&home)
        .args(["config", "set", "settings.default_aov", "75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set settings.default_aov = 75"));

    abhub(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_aov: 75"));

    abhub(&home)
        .args(["config", "set", "nonsense.key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn config_path_names_the_files() {
    let home = TempDir::new().unwrap();
    abhub(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains("ideas.json"));
}

#[test]
fn data_file_env_var_is_honored() {
    let home = TempDir::new().unwrap();
    let data = data_file(&home);

    let mut cmd = abhub(&home);
    cmd.env("ABHUB_DATA_FILE", &data);
    cmd.args([
        "ideas",
        "add",
        "Env var idea",
        "-i",
        "5",
        "-c",
        "5",
        "-e",
        "5",
        "-r",
        "2.0",
        "--improvement",
        "5",
        "--traffic",
        "10000",
    ])
    .assert()
    .success();

    abhub(&home)
        .args(["ideas", "list", "--data-file", &data])
        .assert()
        .success()
        .stdout(predicate::str::contains("Env var idea"));
}
