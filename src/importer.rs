use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::columns::ColumnRole;
use crate::error::{Result, UtaError};
use crate::models::{ParseResult, ParsedRow};
use crate::parser::{normalize_key, parse_csv};

pub const INVALID_FORMAT_WARNING: &str = "Invalid CSV format.";
pub const EXPECTED_EXPORT_HINT: &str = "Please upload Bybit export: AssetChangeDetails (UTA) CSV.";

const TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn uta_export_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)^Bybit_AssetChangeDetails_uta_.*\.csv$").ok())
        .as_ref()
}

/// True for names like `Bybit_AssetChangeDetails_uta_123_20250101_20251231_0.csv`.
pub fn is_uta_export(file_name: &str) -> bool {
    uta_export_pattern().is_some_and(|re| re.is_match(file_name.trim()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Column holding timestamps: the resolved time role, else the first header
/// mentioning "time" (Bybit uses `Time(UTC)`).
fn time_column(result: &ParseResult) -> Option<usize> {
    result.columns.get(ColumnRole::Time).or_else(|| {
        result
            .headers
            .iter()
            .position(|h| normalize_key(h).contains("time"))
    })
}

fn covered_period(result: &ParseResult) -> Option<(String, String)> {
    let idx = time_column(result);
    let mut stamps = result
        .rows
        .iter()
        .filter_map(|r| r.cell_at(&result.headers, idx))
        .filter_map(parse_timestamp);
    let first = stamps.next()?;
    let (min, max) = stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
    let fmt = "%Y-%m-%d %H:%M:%S";
    Some((min.format(fmt).to_string(), max.format(fmt).to_string()))
}

// ---------------------------------------------------------------------------
// Single file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub name: String,
    pub rows: usize,
    pub headers: usize,
    pub checksum: String,
    pub first_time: Option<String>,
    pub last_time: Option<String>,
}

pub struct LoadedFile {
    pub report: FileReport,
    pub result: ParseResult,
}

/// Parse one export from disk. The name is checked before anything is read.
pub fn load_file(path: &Path) -> Result<LoadedFile> {
    let name = display_name(path);
    if !is_uta_export(&name) {
        return Err(UtaError::InvalidFileName(name));
    }

    let data = std::fs::read(path)?;
    let checksum = compute_checksum(&data);
    let result = parse_csv(&String::from_utf8_lossy(&data));
    let (first_time, last_time) = match covered_period(&result) {
        Some((a, b)) => (Some(a), Some(b)),
        None => (None, None),
    };
    info!(file = %name, rows = result.rows.len(), "Parsed export");

    Ok(LoadedFile {
        report: FileReport {
            name,
            rows: result.rows.len(),
            headers: result.headers.len(),
            checksum,
            first_time,
            last_time,
        },
        result,
    })
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Rows of every usable file, concatenated in argument order.
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub files: Vec<FileReport>,
    pub rows: Vec<ParsedRow>,
    pub warnings: Vec<String>,
}

impl ImportBatch {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Load several exports. Per-file problems become warnings prefixed with the
/// file name; they never abort the batch.
pub fn load_files(paths: &[PathBuf]) -> ImportBatch {
    let mut batch = ImportBatch::default();
    let mut seen: HashMap<String, String> = HashMap::new();

    for path in paths {
        let name = display_name(path);
        let loaded = match load_file(path) {
            Ok(l) => l,
            Err(UtaError::InvalidFileName(_)) => {
                warn!(file = %name, "Rejected file name");
                batch
                    .warnings
                    .push(format!("{name}: {INVALID_FORMAT_WARNING} {EXPECTED_EXPORT_HINT}"));
                continue;
            }
            Err(e) => {
                warn!(file = %name, error = %e, "Failed to load file");
                batch.warnings.push(format!("{name}: {e}"));
                continue;
            }
        };

        if let Some(first) = seen.get(&loaded.report.checksum) {
            debug!(file = %name, duplicate_of = %first, "Skipping duplicate export");
            batch
                .warnings
                .push(format!("{name}: same contents as {first}, skipped."));
            continue;
        }
        seen.insert(loaded.report.checksum.clone(), name.clone());

        batch
            .warnings
            .extend(loaded.result.warnings.iter().map(|w| format!("{name}: {w}")));
        batch.rows.extend(loaded.result.rows);
        batch.files.push(loaded.report);
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Uid,Currency,Contract,Type,Direction,Quantity,Filled Price,Funding,Fee Paid,Change,Wallet Balance,Time(UTC)
1,ADA,ADAUSDT,TRADE,BUY,100,0.5,,0,100,100,2025-03-02 10:00:00
1,USDT,,SETTLEMENT,,,,-0.2,,-0.2,500,2025-03-01 08:00:00
";

    fn write_export(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_is_uta_export() {
        assert!(is_uta_export("Bybit_AssetChangeDetails_uta_123_20250101_20251231_0.csv"));
        assert!(is_uta_export("  bybit_assetchangedetails_UTA_1.CSV "));
        assert!(!is_uta_export("Bybit_AssetChangeDetails_spot_1.csv"));
        assert!(!is_uta_export("Bybit_AssetChangeDetails_uta_1.xlsx"));
        assert!(!is_uta_export("Bybit_AssetChangeDetails_uta_1.csv.bak"));
        // Same answer on repeated calls with the cached pattern.
        assert!(is_uta_export("Bybit_AssetChangeDetails_uta_2.csv"));
        assert!(!is_uta_export("export_Bybit_AssetChangeDetails_uta_1.csv"));
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2025-03-02 10:00:00").is_some());
        assert!(parse_timestamp("2025-03-02T10:00:00").is_some());
        assert!(parse_timestamp("2025-03-02").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_load_file_reports_period_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(dir.path(), "Bybit_AssetChangeDetails_uta_1.csv", SAMPLE);
        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.report.rows, 2);
        assert_eq!(loaded.report.headers, 12);
        assert_eq!(loaded.report.checksum.len(), 64);
        assert_eq!(loaded.report.first_time.as_deref(), Some("2025-03-01 08:00:00"));
        assert_eq!(loaded.report.last_time.as_deref(), Some("2025-03-02 10:00:00"));
    }

    #[test]
    fn test_load_file_rejects_name_before_reading() {
        let err = load_file(Path::new("/does/not/exist/report.csv")).err().unwrap();
        assert!(matches!(err, UtaError::InvalidFileName(_)));
    }

    #[test]
    fn test_load_files_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_export(dir.path(), "Bybit_AssetChangeDetails_uta_1.csv", SAMPLE);
        let copy = write_export(dir.path(), "Bybit_AssetChangeDetails_uta_2.csv", SAMPLE);
        let wrong = write_export(dir.path(), "statement.csv", SAMPLE);
        let missing = dir.path().join("Bybit_AssetChangeDetails_uta_9.csv");

        let batch = load_files(&[good, wrong, copy, missing]);
        assert_eq!(batch.files.len(), 1);
        assert_eq!(batch.rows.len(), 2);
        assert!(batch
            .warnings
            .iter()
            .any(|w| w.starts_with("statement.csv: Invalid CSV format.")));
        assert!(batch
            .warnings
            .iter()
            .any(|w| w.contains("same contents as Bybit_AssetChangeDetails_uta_1.csv")));
        assert!(batch
            .warnings
            .iter()
            .any(|w| w.starts_with("Bybit_AssetChangeDetails_uta_9.csv: IO error")));
    }

    #[test]
    fn test_load_files_labels_parse_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write_export(dir.path(), "Bybit_AssetChangeDetails_uta_e.csv", "\n\n");
        let batch = load_files(&[empty]);
        assert_eq!(batch.files.len(), 1);
        assert!(batch.rows.is_empty());
        assert_eq!(
            batch.warnings,
            vec!["Bybit_AssetChangeDetails_uta_e.csv: CSV appears empty."]
        );
    }
}
