use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default)]
    pub sources: Sources,
}

/// File names of the sheet exports inside the data directory. Extension
/// picks the reader (csv, json, xlsx).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sources {
    #[serde(default = "default_deposits")]
    pub deposits: String,
    #[serde(default = "default_withdrawals")]
    pub withdrawals: String,
    #[serde(default = "default_settlements")]
    pub settlements: String,
    #[serde(default = "default_commissions")]
    pub commissions: String,
    #[serde(default = "default_shop_balance")]
    pub shop_balance: String,
}

fn default_deposits() -> String {
    "total_deposit.csv".to_string()
}
fn default_withdrawals() -> String {
    "total_withdrawal.csv".to_string()
}
fn default_settlements() -> String {
    "stlm_topup.csv".to_string()
}
fn default_commissions() -> String {
    "comm.csv".to_string()
}
fn default_shop_balance() -> String {
    "shops_balance.csv".to_string()
}

impl Default for Sources {
    fn default() -> Self {
        Sources {
            deposits: default_deposits(),
            withdrawals: default_withdrawals(),
            settlements: default_settlements(),
            commissions: default_commissions(),
            shop_balance: default_shop_balance(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            sources: Sources::default(),
        }
    }
}

/// Absolute paths of every source table.
pub struct SourcePaths {
    pub deposits: PathBuf,
    pub withdrawals: PathBuf,
    pub settlements: PathBuf,
    pub commissions: PathBuf,
    pub shop_balance: PathBuf,
}

impl Settings {
    pub fn source_paths(&self, override_dir: Option<&str>) -> SourcePaths {
        let dir = PathBuf::from(override_dir.unwrap_or(&self.data_dir));
        SourcePaths {
            deposits: dir.join(&self.sources.deposits),
            withdrawals: dir.join(&self.sources.withdrawals),
            settlements: dir.join(&self.sources.settlements),
            commissions: dir.join(&self.sources.commissions),
            shop_balance: dir.join(&self.sources.shop_balance),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("shoptally")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

#[cfg(feature = "gate")]
pub fn credentials_path() -> PathBuf {
    config_dir().join("pins.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("shoptally")
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
        .map_err(|e| TallyError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
