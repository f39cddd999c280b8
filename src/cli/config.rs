use crate::error::{Result, UtaError};
use crate::settings::{load_settings, save_settings, settings_path};

pub fn show() -> Result<()> {
    let settings = load_settings();
    println!("Settings file:    {}", settings_path().display());
    println!("Fee decimals:     {}", settings.fee_decimals);
    println!("Amount decimals:  {}", settings.amount_decimals);
    println!("Max warnings:     {}", settings.max_warnings);
    Ok(())
}

pub fn set(
    fee_decimals: Option<usize>,
    amount_decimals: Option<usize>,
    max_warnings: Option<usize>,
) -> Result<()> {
    if fee_decimals.is_none() && amount_decimals.is_none() && max_warnings.is_none() {
        return Err(UtaError::Other(
            "Nothing to change (see `utastat config set --help`)".to_string(),
        ));
    }

    let mut settings = load_settings();
    if let Some(d) = fee_decimals {
        settings.fee_decimals = d;
    }
    if let Some(d) = amount_decimals {
        settings.amount_decimals = d;
    }
    if let Some(n) = max_warnings {
        settings.max_warnings = n;
    }
    save_settings(&settings)?;
    println!("Saved {}", settings_path().display());
    Ok(())
}
