use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::timetable::{Grid, DEFAULT_SLOTS_PER_DAY, MAX_SLOTS_PER_DAY};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub sqlite_path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Teaching slots per weekday.
    #[serde(default = "default_slots_per_day")]
    pub slots_per_day: u8,
}

fn default_slots_per_day() -> u8 {
    DEFAULT_SLOTS_PER_DAY
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            slots_per_day: default_slots_per_day(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Fixed seed for block shuffling. Unset means a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("timetabler")
        .join("timetabler.db")
}

impl Config {
    /// Load from the default location, writing defaults if no file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let slots = self.grid.slots_per_day;
        if slots == 0 || slots > MAX_SLOTS_PER_DAY {
            bail!("grid.slots_per_day must be between 1 and {}, got {}", MAX_SLOTS_PER_DAY, slots);
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid.slots_per_day)
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("timetabler")
    }

    /// `TIMETABLER_CONFIG` if set, otherwise the per-user config file.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("TIMETABLER_CONFIG") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }
}
