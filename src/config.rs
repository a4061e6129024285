//! # Configuration
//!
//! Settings resolve in the order defaults → config file → env vars → CLI
//! flags. The file lives at `<config dir>/nongli/config.toml` (e.g.
//! `~/.config/nongli/config.toml` on Linux) unless `--config` names another.
//!
//! ```toml
//! [engine]
//! converter = "table"      # "table" or "platform"
//!
//! [logging]
//! level = "warn"           # "off", "error", "warn", "info", "debug", "trace"
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::engine::ConverterKind;

pub const ENV_CONVERTER: &str = "NONGLI_CONVERTER";
pub const ENV_LOG: &str = "NONGLI_LOG";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NongliConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EngineConfig {
    pub converter: Option<ConverterKind>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub converter: ConverterKind,
    pub log_level: LevelFilter,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "config I/O error ({}): {e}", path.display()),
            ConfigError::Parse(path, e) => {
                write!(f, "config parse error ({}): {e}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the default config file path.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nongli").join("config.toml"))
}

/// Loads the config file.
///
/// With `path = None` the default location is used, and a missing file
/// yields `NongliConfig::default()`. An explicitly named file must exist.
pub fn load_config(path: Option<&Path>) -> Result<NongliConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) if p.exists() => p,
            _ => {
                debug!("No config file found, using defaults");
                return Ok(NongliConfig::default());
            }
        },
    };

    let contents = fs::read_to_string(&path).map_err(|e| ConfigError::Io(path.clone(), e))?;
    let config = parse_config(&contents).map_err(|e| ConfigError::Parse(path.clone(), e))?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<NongliConfig, toml::de::Error> {
    toml::from_str(contents)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolves the final config from the file, the process environment and
/// CLI flags (`None` = not specified).
pub fn resolve(
    config: &NongliConfig,
    cli_converter: Option<ConverterKind>,
    cli_log_level: Option<LevelFilter>,
) -> ResolvedConfig {
    resolve_with_env(config, cli_converter, cli_log_level, |key| {
        std::env::var(key).ok()
    })
}

/// Like [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &NongliConfig,
    cli_converter: Option<ConverterKind>,
    cli_log_level: Option<LevelFilter>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Converter: CLI → env → config → default
    let converter = cli_converter
        .or_else(|| env(ENV_CONVERTER).and_then(|v| parse_converter(&v)))
        .or(config.engine.converter)
        .unwrap_or_default();

    // Log level: CLI → env → config → default
    let log_level = cli_log_level
        .or_else(|| env(ENV_LOG).and_then(|v| parse_level(&v)))
        .or_else(|| config.logging.level.as_deref().and_then(parse_level))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        converter,
        log_level,
    }
}

fn parse_converter(value: &str) -> Option<ConverterKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "table" => Some(ConverterKind::TableBased),
        "platform" => Some(ConverterKind::PlatformApproximate),
        other => {
            warn!("Ignoring unknown converter {other:?}");
            None
        }
    }
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(value.trim())
        .inspect_err(|_| warn!("Ignoring unknown log level {value:?}"))
        .ok()
}
