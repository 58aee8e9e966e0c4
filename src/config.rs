use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::distance::{DEFAULT_REFERENCE_RSSI_DBM, FREE_SPACE_PATH_LOSS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scan: ScanConfig,
    pub wifi: WifiConfig,
    #[serde(default)]
    pub distance: DistanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Bluetooth adapter to use; first available when unset
    pub adapter: Option<String>,
    /// How long a device stays listed without a fresh sighting
    pub retention_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WifiConfig {
    /// Wi-Fi scanning is wired up but off until this is set
    pub enabled: bool,
    /// Wireless interface to scan on; any managed interface when unset
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceConfig {
    /// Reference signal strength at 1 meter (dBm), used when an
    /// advertisement carries no calibrated power level
    pub reference_rssi_dbm: i32,
    /// Path loss exponent: 2.0 = free space, 2.5-4.0 = indoors with obstacles
    pub path_loss_exponent: f64,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        DistanceConfig {
            reference_rssi_dbm: DEFAULT_REFERENCE_RSSI_DBM,
            path_loss_exponent: FREE_SPACE_PATH_LOSS,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| "Failed to parse config file")?;

        Ok(config)
    }

    pub fn default_config() -> Self {
        Config {
            scan: ScanConfig {
                adapter: None,
                retention_ms: 5000,
            },
            wifi: WifiConfig {
                enabled: false,
                interface: None,
            },
            distance: DistanceConfig::default(),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
