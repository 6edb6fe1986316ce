//! End-to-end tests for the tabrec binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn sample_report() -> String {
    [
        "รายงานการขายสินค้า - แยกตามผู้ขาย รอบวันที่ 1 - 31 ธันวาคม 2567",
        "Vendor 2040334 / คิงคองคือป (2040334)",
        "1 | 123456 | 8851234567890 | ผลิตภัณฑ์เสริมอาหาร | 2012345678 | 5101234567 | 10.50 | 3 | 31.50 | 2.21 | 33.71",
    ]
    .join("\n")
}

#[test]
fn process_writes_json_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("SALE_2040334_202412H01.txt");
    std::fs::write(&input, sample_report()).unwrap();

    let mut cmd = Command::cargo_bin("tabrec").unwrap();
    cmd.arg("process").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"vendor_id\": \"2040334\""))
        .stdout(predicate::str::contains("\"barcode\": \"8851234567890\""))
        .stdout(predicate::str::contains("\"period_start_date\": \"2024-12-01\""));
}

#[test]
fn process_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("SALE_2040334_202412H01.txt");
    let output = dir.path().join("out.json");
    std::fs::write(&input, sample_report()).unwrap();

    let mut cmd = Command::cargo_bin("tabrec").unwrap();
    cmd.arg("process")
        .arg(&input)
        .arg("--output")
        .arg(&output);
    cmd.assert().success();

    let written = std::fs::read_to_string(&output).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["header"]["vendor_id"], "2040334");
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["items"][0]["no"], 1);
}

#[test]
fn process_rejects_blank_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("blank.txt");
    std::fs::write(&input, "   \n").unwrap();

    let mut cmd = Command::cargo_bin("tabrec").unwrap();
    cmd.arg("process").arg(&input);
    cmd.assert().failure();
}

#[test]
fn config_show_prints_defaults() {
    let mut cmd = Command::cargo_bin("tabrec").unwrap();
    cmd.arg("config").arg("show");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("tax_rate"));
}
