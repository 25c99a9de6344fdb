use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Photovoltaic installation parameters used by the energy estimator.
///
/// Loaded once at startup and never mutated afterwards; every estimator is
/// constructed from an owned copy, so there is no shared mutable state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolarInstallation {
    /// Installed peak power of the installation, in kW.
    pub power_kw: f64,
    /// Panel efficiency as a fraction, e.g. 0.20 for 20%.
    pub panel_efficiency: f64,
    /// Remaining output after system losses, e.g. 0.85 for 15% losses.
    pub system_losses: f64,
}

impl Default for SolarInstallation {
    fn default() -> Self {
        Self { power_kw: 2.5, panel_efficiency: 0.20, system_losses: 0.85 }
    }
}

/// Connection settings for the upstream forecast provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the provider API, e.g. <https://api.open-meteo.com/v1>.
    pub base_url: String,
    /// Per-request timeout in seconds. There is no retry on timeout.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self { base_url: "https://api.open-meteo.com/v1".to_string(), timeout_secs: 10 }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [solar]
/// power_kw = 2.5
/// panel_efficiency = 0.2
/// system_losses = 0.85
///
/// [upstream]
/// base_url = "https://api.open-meteo.com/v1"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub solar: SolarInstallation,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

impl Config {
    /// Load config from the platform config directory, or return defaults if
    /// no file exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit path. Unlike [`Config::load`], a missing
    /// file here is an error: the caller asked for this file specifically.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "solar-weather", "solar-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
