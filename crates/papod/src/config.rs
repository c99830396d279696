//! Configuration management for papod.
//!
//! Loads settings from $PAPOD_CONFIG, /etc/papo/config.toml or
//! /var/lib/papo/config.toml, in that order, or uses defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/papo/config.toml";

/// Default config file path for fallback
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/papo/config.toml";

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "PAPOD_CONFIG";

/// Environment variable overriding `server.bind_addr`
pub const BIND_ENV: &str = "PAPOD_BIND";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP API listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationConfig {
    /// XP awarded to a known user for each voice command
    #[serde(default = "default_voice_command_xp")]
    pub voice_command_xp: i64,
}

fn default_voice_command_xp() -> i64 {
    2
}

impl Default for GamificationConfig {
    fn default() -> Self {
        Self {
            voice_command_xp: default_voice_command_xp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Read/apply/write attempts before a conflicting update gives up
    #[serde(default = "default_max_update_attempts")]
    pub max_update_attempts: u32,
}

fn default_max_update_attempts() -> u32 {
    3
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_update_attempts: default_max_update_attempts(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gamification: GamificationConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load config from the first readable location, then apply env overrides
    pub fn load() -> Self {
        let explicit = std::env::var(CONFIG_ENV).ok();
        let mut config = Self::load_first(&Self::candidates(explicit.as_deref()));

        if let Ok(bind) = std::env::var(BIND_ENV) {
            info!("Bind address overridden by {}: {}", BIND_ENV, bind);
            config.server.bind_addr = bind;
        }
        config
    }

    /// Search order: the explicit path if any, then the system locations
    fn candidates(explicit: Option<&str>) -> Vec<String> {
        explicit
            .into_iter()
            .chain([CONFIG_PATH, DEFAULT_CONFIG_PATH])
            .map(str::to_string)
            .collect()
    }

    /// First path that loads wins. Missing files are skipped quietly, broken
    /// ones are reported before moving on.
    fn load_first(paths: &[String]) -> Self {
        for path in paths {
            match Self::load_from_path(path) {
                Ok(config) => return config,
                Err(e) if is_not_found(&e) => debug!("No config at {}", path),
                Err(e) => warn!("Ignoring config at {}: {:#}", path, e),
            }
        }
        info!("No config file found, using defaults");
        Config::default()
    }

    /// Load config from a given path
    pub fn load_from_path(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path))?;
        info!("Loaded config from {}", path);
        Ok(config)
    }

    /// Save default config to path (for init)
    pub fn save_default(path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!("Saved default config to {}", path.display());
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map_or(false, |io| io.kind() == std::io::ErrorKind::NotFound)
}
