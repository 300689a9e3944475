use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_compute_statistics_reports_and_continues() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("TC1.txt");
    fs::write(&data, "1\n2\nabc\n3\n4\n").unwrap();
    let out = tmp.path().join("out");

    cargo_bin_cmd!("compute_statistics")
        .arg(&data)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("ERROR: TC1.txt - line 3: 'abc' skipped"))
        .stdout(predicate::str::contains("Mean: 2.500000"))
        .stdout(predicate::str::contains("Standard Deviation (sample): 1.290994"));

    let report = fs::read_to_string(out.join("StatisticsResults.txt")).unwrap();
    assert!(report.contains("Median: 2.500000"));
}

#[test]
fn test_population_variance_from_config_file() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("TC1.txt");
    fs::write(&data, "1\n2\n3\n4\n").unwrap();
    let config = tmp.path().join("settings.toml");
    fs::write(
        &config,
        format!(
            "[output]\ndir = {:?}\n\n[statistics]\nvariance = \"population\"\nprecision = 2\n",
            tmp.path().join("results").to_string_lossy()
        ),
    )
    .unwrap();

    cargo_bin_cmd!("compute_statistics")
        .arg(&data)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Variance (population): 1.25"));

    assert!(tmp.path().join("results/StatisticsResults.txt").exists());
}

#[test]
fn test_missing_path_fails() {
    let tmp = TempDir::new().unwrap();

    cargo_bin_cmd!("word_count")
        .arg(tmp.path().join("absent.txt"))
        .arg("--output-dir")
        .arg(tmp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No such file or directory"));
}

#[test]
fn test_folder_without_test_cases_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("notes.txt"), "1\n").unwrap();

    cargo_bin_cmd!("convert_numbers")
        .arg(tmp.path())
        .arg("--output-dir")
        .arg(tmp.path().join("out"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No TC files found"));
}

#[test]
fn test_convert_numbers_folder() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("TC1.txt"), "255\n16\n").unwrap();
    fs::write(tmp.path().join("TC2.txt"), "-3\nxyz\n").unwrap();
    let out = tmp.path().join("out");

    cargo_bin_cmd!("convert_numbers")
        .arg(tmp.path())
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("255\t11111111\tFF"))
        .stdout(predicate::str::contains("-3\t-11\t-3"))
        .stdout(predicate::str::contains("'xyz' skipped"));

    let report = fs::read_to_string(out.join("ConvertionResults.txt")).unwrap();
    assert!(report.contains("16\t10000\t10"));
}

#[test]
fn test_word_count_case_sensitive_flag() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("TC1.txt");
    fs::write(&data, "Word word\n").unwrap();

    cargo_bin_cmd!("word_count")
        .arg(&data)
        .arg("--case-sensitive")
        .arg("--output-dir")
        .arg(tmp.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Word: 1"))
        .stdout(predicate::str::contains("word: 1"));
}

#[test]
fn test_compute_sales_without_catalogue_fails() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("TC1")).unwrap();

    cargo_bin_cmd!("compute_sales")
        .arg(tmp.path())
        .arg("--output-dir")
        .arg(tmp.path().join("out"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not load the product catalogue"));
}

#[test]
fn test_compute_sales_text_inputs() {
    let tmp = TempDir::new().unwrap();
    let tc1 = tmp.path().join("TC1");
    fs::create_dir_all(&tc1).unwrap();
    fs::write(tc1.join("ProductList.txt"), "Coffee 2.5\nBagel 1.75\n").unwrap();
    fs::write(tc1.join("Sales.txt"), "Coffee 2\nBagel 4\nMuffin 1\n").unwrap();
    let out = tmp.path().join("out");

    cargo_bin_cmd!("compute_sales")
        .arg(tmp.path())
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("TOTAL COST: 12.00"))
        .stdout(predicate::str::contains("product 'muffin' not in catalogue"));

    let report = fs::read_to_string(out.join("SalesResults.txt")).unwrap();
    assert!(report.contains("WARNING: Sales products missing from catalogue:"));
}
