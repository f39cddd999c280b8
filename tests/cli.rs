use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const EXPORT: &str = "\u{feff}Bybit Unified Trading Account\r\n\
UID: 123456789\r\n\
\r\n\
Uid,Currency,Contract,Type,Direction,Quantity,Position,Filled Price,Funding,Fee Paid,Cash Flow,Change,Wallet Balance,Action,OrderId,TradeId,Time(UTC)\r\n\
123456789,USDT,,FEE_REFUND,,,,,,,,0.05,1024.5,,,,2025-03-04 00:00:00\r\n\
123456789,USDT,ADAUSDT,SETTLEMENT,,,,,0.1,,,0.1,1024.45,,,,2025-03-03 08:00:00\r\n\
123456789,USDT,BTCUSDT,SETTLEMENT,,,,,-0.2,,,-0.2,1024.35,,,,2025-03-03 00:00:00\r\n\
123456789,ADA,ADAUSDT,TRADE,SELL,-40,60,0.6,,0,,-40,60,SELL,o2,t2,2025-03-02 12:00:00\r\n\
123456789,USDT,ADAUSDT,TRADE,SELL,24,,0.6,,-1.5,,22.5,1024.55,SELL,o2,t2,2025-03-02 12:00:00\r\n\
123456789,ADA,ADAUSDT,TRADE,BUY,100,100,0.5,,0,,100,100,BUY,o1,t1,2025-03-01 09:30:00\r\n\
123456789,USDT,ADAUSDT,TRADE,BUY,-50,,0.5,,0,,-50,1002.05,BUY,o1,t1,2025-03-01 09:30:00\r\n";

const EXPORT_NAME: &str = "Bybit_AssetChangeDetails_uta_123456789_20250101_20251231_0.csv";

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn utastat(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("utastat").unwrap();
    cmd.env("UTASTAT_CONFIG_DIR", config_dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.output().unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).unwrap()
}

fn approx(v: &serde_json::Value, expected: f64) -> bool {
    (v.as_f64().unwrap() - expected).abs() < 1e-9
}

#[test]
fn summary_json_reports_balance_fees_and_positions() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_file(dir.path(), EXPORT_NAME, EXPORT);

    let v = json_output(utastat(dir.path()).arg("summary").arg(&export).arg("--json"));

    assert_eq!(v["rows"], 7);
    assert!(approx(&v["walletBalance"], 1024.5));

    let fees = &v["fees"];
    assert!(approx(&fees["tradingFeesUsdt"], -1.5));
    assert!(approx(&fees["fundingPaidUsdt"], -0.2));
    assert!(approx(&fees["fundingReceivedUsdt"], 0.1));
    assert!(approx(&fees["feeRefundUsdt"], 0.05));
    assert!(approx(&fees["netCostUsdt"], 1.65));

    let positions = v["trades"]["positions"].as_array().unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0]["coin"], "ADA");
    assert_eq!(positions[0]["quote"], "USDT");
    assert_eq!(positions[0]["status"], "PARTIAL");
    assert!(approx(&positions[0]["netQty"], 60.0));

    let files = v["files"].as_array().unwrap();
    assert_eq!(files[0]["firstTime"], "2025-03-01 09:30:00");
    assert_eq!(files[0]["lastTime"], "2025-03-04 00:00:00");

    let warnings = v["warnings"].as_array().unwrap();
    assert!(warnings
        .iter()
        .any(|w| w.as_str().unwrap().ends_with("Skipped 2 metadata row(s) before header.")));
}

#[test]
fn trades_json_lists_bought_and_sold() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_file(dir.path(), EXPORT_NAME, EXPORT);

    let v = json_output(utastat(dir.path()).arg("trades").arg(&export).arg("--json"));

    let bought = v["bought"].as_array().unwrap();
    assert_eq!(bought.len(), 1);
    assert!(approx(&bought[0]["totalQty"], 100.0));
    assert!(approx(&bought[0]["totalQuoteAmount"], 50.0));
    assert!(approx(&bought[0]["avgPrice"], 0.5));

    let sold = v["sold"].as_array().unwrap();
    assert!(approx(&sold[0]["totalQty"], 40.0));
    assert!(approx(&sold[0]["totalQuoteAmount"], 24.0));
}

#[test]
fn summary_text_shows_tables() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_file(dir.path(), EXPORT_NAME, EXPORT);

    utastat(dir.path())
        .arg("summary")
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("1,024.50 USD"))
        .stdout(predicate::str::contains("1.6500"))
        .stdout(predicate::str::contains("PARTIAL"));
}

#[test]
fn duplicate_export_is_counted_once() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), EXPORT_NAME, EXPORT);
    let b = write_file(dir.path(), "Bybit_AssetChangeDetails_uta_copy.csv", EXPORT);

    let v = json_output(utastat(dir.path()).arg("fees").arg(&a).arg(&b).arg("--json"));
    assert!(approx(&v["fees"]["tradingFeesUsdt"], -1.5));
    assert!(v["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .any(|w| w.as_str().unwrap().contains("same contents as")));
}

#[test]
fn wrongly_named_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_file(dir.path(), "transactions.csv", EXPORT);

    utastat(dir.path())
        .arg("summary")
        .arg(&export)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid CSV format."))
        .stderr(predicate::str::contains("None of the given files could be loaded"));
}

#[test]
fn rejected_file_does_not_block_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_file(dir.path(), EXPORT_NAME, EXPORT);
    let bad = write_file(dir.path(), "notes.txt", "hello");

    let v = json_output(utastat(dir.path()).arg("fees").arg(&bad).arg(&good).arg("--json"));
    assert!(approx(&v["fees"]["netCostUsdt"], 1.65));
    assert!(v["warnings"][0]
        .as_str()
        .unwrap()
        .starts_with("notes.txt: Invalid CSV format."));
}

#[test]
fn inspect_reports_layout() {
    let dir = tempfile::tempdir().unwrap();
    let export = write_file(dir.path(), EXPORT_NAME, EXPORT);

    let v = json_output(
        utastat(dir.path())
            .arg("inspect")
            .arg(&export)
            .args(["--limit", "2", "--json"]),
    );
    assert_eq!(v["headers"][0], "Uid");
    assert_eq!(v["columns"]["category"], 3);
    assert_eq!(v["columns"]["symbol"], 1);
    assert_eq!(v["strategy"], "depositWithdraw");
    assert_eq!(v["rows"].as_array().unwrap().len(), 2);
    assert_eq!(v["rows"][0]["rowId"], "1");
    assert_eq!(v["rows"][0]["category"], "FEE_REFUND");
}

#[test]
fn config_set_then_show() {
    let dir = tempfile::tempdir().unwrap();

    utastat(dir.path())
        .args(["config", "set", "--fee-decimals", "2"])
        .assert()
        .success();
    assert!(dir.path().join("settings.json").exists());

    utastat(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fee decimals:     2"));

    let export = write_file(dir.path(), EXPORT_NAME, EXPORT);
    utastat(dir.path())
        .arg("fees")
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("1.65"))
        .stdout(predicate::str::contains("1.6500").not());
}

#[test]
fn config_set_without_values_fails() {
    let dir = tempfile::tempdir().unwrap();
    utastat(dir.path())
        .args(["config", "set"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to change"));
}
