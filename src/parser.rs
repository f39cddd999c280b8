use std::collections::BTreeMap;

use tracing::debug;

use crate::columns::{ColumnMap, ColumnRole};
use crate::models::{ParseResult, ParsedRow};

/// Rows inspected when looking for the real header line.
const HEADER_SCAN_LIMIT: usize = 30;

// ---------------------------------------------------------------------------
// Text and matrix
// ---------------------------------------------------------------------------

/// Drop a leading byte-order mark and unify line endings to `\n`.
pub fn normalize_text(input: &str) -> String {
    let text = input.strip_prefix('\u{feff}').unwrap_or(input);
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn is_blank_row(cells: &[String]) -> bool {
    cells.iter().all(|c| c.trim().is_empty())
}

/// Split normalized text into rows of cells. A `"` outside quotes opens
/// quoting wherever it appears in a field; inside quotes `""` is a literal
/// quote and a lone `"` closes. Rows made only of blank cells are dropped;
/// rows may have different widths.
pub fn parse_matrix(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\n' => {
                row.push(std::mem::take(&mut field));
                let done = std::mem::take(&mut row);
                if !is_blank_row(&done) {
                    rows.push(done);
                }
            }
            _ => field.push(ch),
        }
    }

    row.push(field);
    if !is_blank_row(&row) {
        rows.push(row);
    }
    if in_quotes {
        debug!("Input ended inside a quoted field");
    }
    rows
}

// ---------------------------------------------------------------------------
// Header helpers
// ---------------------------------------------------------------------------

/// Trim and collapse runs of whitespace to a single space.
pub fn clean_header(h: &str) -> String {
    h.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase alphanumeric form of a header, e.g. `Time (UTC)` -> `timeutc`.
pub fn normalize_key(h: &str) -> String {
    clean_header(h)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

fn header_score(row: &[String]) -> usize {
    let keys: Vec<String> = row.iter().map(|c| normalize_key(c)).collect();
    let has = |names: &[&str]| keys.iter().any(|k| names.contains(&k.as_str()));

    [
        has(&["uid", "userid"]),
        keys.iter().any(|k| k.contains("date")),
        has(&["coin", "asset", "currency"]),
        has(&["qty", "amount", "quantity"]),
    ]
    .into_iter()
    .filter(|hit| *hit)
    .count()
}

/// Index of the first row among the first 30 that looks like a column
/// header, or 0 when none does.
pub fn find_header_row(matrix: &[Vec<String>]) -> usize {
    matrix
        .iter()
        .take(HEADER_SCAN_LIMIT)
        .position(|row| header_score(row) >= 3)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// parse_csv
// ---------------------------------------------------------------------------

pub fn parse_csv(input: &str) -> ParseResult {
    let mut warnings = Vec::new();
    let matrix = parse_matrix(&normalize_text(input));

    if matrix.is_empty() {
        return ParseResult {
            headers: Vec::new(),
            rows: Vec::new(),
            warnings: vec!["CSV appears empty.".to_string()],
            columns: ColumnMap::default(),
            strategy: ColumnMap::default().metric_strategy(),
        };
    }

    let header_idx = find_header_row(&matrix);
    if header_idx > 0 {
        warnings.push(format!("Skipped {header_idx} metadata row(s) before header."));
    }

    let headers: Vec<String> = matrix[header_idx].iter().map(|h| clean_header(h)).collect();
    let columns = ColumnMap::resolve(&headers);
    let strategy = columns.metric_strategy();
    if let Some(w) = strategy.warning() {
        warnings.push(w.to_string());
    }
    debug!(header_row = header_idx, ?columns, ?strategy, "Resolved CSV layout");

    let idx_category = columns.get(ColumnRole::Category);
    let rows: Vec<ParsedRow> = matrix[header_idx + 1..]
        .iter()
        .filter(|cols| !is_blank_row(cols))
        .enumerate()
        .map(|(i, cols)| {
            let cell = |idx: usize| cols.get(idx).cloned().unwrap_or_default();
            let raw: BTreeMap<String, String> = headers
                .iter()
                .enumerate()
                .map(|(idx, h)| (h.clone(), cell(idx)))
                .collect();
            let category = idx_category
                .map(|idx| cell(idx).trim().to_string())
                .filter(|c| !c.is_empty());
            ParsedRow {
                row_id: (i + 1).to_string(),
                raw,
                category,
            }
        })
        .collect();

    ParseResult {
        headers,
        rows,
        warnings,
        columns,
        strategy,
    }
}
