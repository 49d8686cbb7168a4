//! trait-compose configuration system
//!
//! A single RON file configures logging and the diagnostics emitted while
//! attaching traits. Configuration never changes resolution semantics.
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. Environment variable TRAIT_COMPOSE_LOG (log level only)
//! 2. Explicit file (--config FILE)
//! 3. Project-level (./trait-compose.ron)
//! 4. User-level (~/.config/trait-compose/config.ron)
//! 5. Default values
//! ```
//!
//! Only the first file found is read; files are not merged.
//!
//! # Usage
//!
//! ```rust
//! use trait_compose::util::config::EngineConfig;
//!
//! let config: EngineConfig = ron::from_str("(log: (level: debug))").unwrap();
//! assert!(!config.attach.report_conflicts);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::compose::AttachOptions;
use crate::util::logger::LogLevel;

/// Project-level config file name
pub const PROJECT_CONFIG_FILE: &str = "trait-compose.ron";

/// User-level config file name, inside [`get_config_dir`]
pub const USER_CONFIG_FILE: &str = "config.ron";

/// Environment variable overriding `log.level`
pub const LOG_ENV_VAR: &str = "TRAIT_COMPOSE_LOG";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EngineConfig {
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
    /// Attachment diagnostics
    #[serde(default)]
    pub attach: AttachConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// Maximum level printed
    #[serde(default)]
    pub level: LogLevel,
    /// Colored level prefixes
    #[serde(default)]
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            ansi: false,
        }
    }
}

/// Diagnostics emitted by `EntityType::uses`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AttachConfig {
    /// Warn when the composed tree has conflicting names
    #[serde(default)]
    pub report_conflicts: bool,
    /// Warn when a requirement is not defined yet
    #[serde(default)]
    pub report_unmet_requirements: bool,
}

impl From<&AttachConfig> for AttachOptions {
    fn from(config: &AttachConfig) -> Self {
        AttachOptions {
            report_conflicts: config.report_conflicts,
            report_unmet_requirements: config.report_unmet_requirements,
        }
    }
}

impl EngineConfig {
    /// Attach options derived from the `attach` section
    pub fn attach_options(&self) -> AttachOptions {
        AttachOptions::from(&self.attach)
    }

    /// Pretty RON rendering
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(ConfigError::Serialize)
    }
}

/// A loaded configuration and the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: EngineConfig,
    /// `None` when defaults were used
    pub source: Option<PathBuf>,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error in `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("config serialize error: {0}")]
    Serialize(#[source] ron::Error),
    #[error("config file `{0}` does not exist")]
    NotFound(PathBuf),
    #[error("invalid {var}: {message}")]
    InvalidEnv { var: &'static str, message: String },
    #[error("cannot determine config directory")]
    NoConfigDir,
}

/// Get the user config directory
pub fn get_config_dir() -> Option<PathBuf> {
    // Try XDG config directory on Unix
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join("trait-compose"));
    }

    // Fallback to ~/.config/trait-compose
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join("trait-compose"));
    }

    // On Windows, try %APPDATA%
    if let Ok(appdata) = std::env::var("APPDATA") {
        return Some(PathBuf::from(appdata).join("trait-compose"));
    }

    None
}

/// Get the user config file path (~/.config/trait-compose/config.ron)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(USER_CONFIG_FILE))
}

/// Read and parse one config file
pub fn load_from_path(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration following the priority order, including the
/// environment override
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut loaded = load_from(explicit, &cwd, get_config_path())?;
    apply_env_override(&mut loaded.config, std::env::var(LOG_ENV_VAR).ok())?;
    Ok(loaded)
}

/// File lookup without consulting the process environment
pub fn load_from(
    explicit: Option<&Path>,
    project_dir: &Path,
    user_path: Option<PathBuf>,
) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        return found(path.to_path_buf());
    }

    let project = project_dir.join(PROJECT_CONFIG_FILE);
    if project.exists() {
        return found(project);
    }

    if let Some(user) = user_path.filter(|p| p.exists()) {
        return found(user);
    }

    debug!("no config file found, using defaults");
    Ok(LoadedConfig {
        config: EngineConfig::default(),
        source: None,
    })
}

fn found(path: PathBuf) -> Result<LoadedConfig, ConfigError> {
    let config = load_from_path(&path)?;
    debug!("config loaded from {}", path.display());
    Ok(LoadedConfig {
        config,
        source: Some(path),
    })
}

/// Apply the value of [`LOG_ENV_VAR`], if set
pub fn apply_env_override(
    config: &mut EngineConfig,
    value: Option<String>,
) -> Result<(), ConfigError> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(());
    };
    config.log.level = value.parse().map_err(|message| ConfigError::InvalidEnv {
        var: LOG_ENV_VAR,
        message,
    })?;
    Ok(())
}

/// Write `config` as the user-level configuration
pub fn save_user_config(config: &EngineConfig) -> Result<PathBuf, ConfigError> {
    let dir = get_config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join(USER_CONFIG_FILE);

    // Create directory if not exists
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
            path: dir.clone(),
            source,
        })?;
    }

    fs::write(&path, config.to_ron()?).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests;
