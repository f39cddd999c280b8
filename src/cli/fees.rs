use std::path::PathBuf;

use serde::Serialize;

use super::tables::fees_table;
use super::{load_batch, print_json, print_warnings};
use crate::error::Result;
use crate::fees::fees_paid;
use crate::models::FeesBreakdown;
use crate::settings::load_settings;

#[derive(Serialize)]
struct FeesReport<'a> {
    fees: FeesBreakdown,
    warnings: &'a [String],
}

pub fn run(files: &[PathBuf], json: bool) -> Result<()> {
    let settings = load_settings();
    let batch = load_batch(files)?;
    let fees = fees_paid(&batch.rows);

    if json {
        return print_json(&FeesReport {
            fees,
            warnings: &batch.warnings,
        });
    }

    println!("Fees\n{}", fees_table(&fees, &settings));
    print_warnings(&batch.warnings, settings.max_warnings);
    Ok(())
}
