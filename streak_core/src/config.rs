//! Configuration file support for Brasa.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/brasa/config.toml`.

use crate::calendar::{parse_day_month, HolidayCalendar};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub streak: StreakConfig,

    #[serde(default)]
    pub holidays: HolidaysConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Streak and gem parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Run days needed to earn one gem
    #[serde(default = "default_milestone_interval")]
    pub milestone_interval: u32,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            milestone_interval: default_milestone_interval(),
        }
    }
}

/// Extra holidays on top of the built-in calendar
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct HolidaysConfig {
    /// Additional `DD-MM` dates that recur every year
    #[serde(default)]
    pub extra: Vec<String>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("brasa")
}

fn default_milestone_interval() -> u32 {
    15
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("brasa").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check that configured values are usable
    pub fn validate(&self) -> Result<()> {
        if self.streak.milestone_interval == 0 {
            return Err(Error::Config(
                "streak.milestone_interval must be at least 1".into(),
            ));
        }
        for entry in &self.holidays.extra {
            parse_day_month(entry)?;
        }
        Ok(())
    }

    /// Holiday calendar with the configured extra dates merged in
    pub fn holiday_calendar(&self) -> Result<HolidayCalendar> {
        let mut extra = Vec::with_capacity(self.holidays.extra.len());
        for entry in &self.holidays.extra {
            extra.push(parse_day_month(entry)?);
        }
        Ok(HolidayCalendar::with_extra(extra))
    }
}
