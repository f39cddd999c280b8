use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UtaError};

/// Overrides the settings directory, mainly for tests and portable installs.
pub const CONFIG_DIR_ENV: &str = "UTASTAT_CONFIG_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_fee_decimals")]
    pub fee_decimals: usize,
    #[serde(default = "default_amount_decimals")]
    pub amount_decimals: usize,
    /// Warnings shown by text reports; JSON output always carries all of them.
    #[serde(default = "default_max_warnings")]
    pub max_warnings: usize,
}

fn default_fee_decimals() -> usize {
    4
}

fn default_amount_decimals() -> usize {
    2
}

fn default_max_warnings() -> usize {
    6
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fee_decimals: default_fee_decimals(),
            amount_decimals: default_amount_decimals(),
            max_warnings: default_max_warnings(),
        }
    }
}

fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("utastat")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| UtaError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}
