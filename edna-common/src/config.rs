//! Configuration loading and resolution
//!
//! Each configurable value is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: a warning is logged and defaults apply.
//! A malformed TOML file or an out-of-range value is an error.

use crate::params::{validate_neighbour_count, NoveltyThreshold, DEFAULT_NEIGHBOUR_COUNT};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable overriding the novelty threshold
pub const ENV_NOVELTY_THRESHOLD: &str = "EDNA_NOVELTY_THRESHOLD";
/// Environment variable overriding the neighbour count
pub const ENV_NEIGHBOUR_COUNT: &str = "EDNA_NEIGHBOUR_COUNT";
/// Environment variable overriding the state directory
pub const ENV_STATE_DIR: &str = "EDNA_STATE_DIR";

/// Compiled defaults for the current platform, computed once
pub static COMPILED_DEFAULTS: Lazy<CompiledDefaults> =
    Lazy::new(CompiledDefaults::for_current_platform);

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// On-disk configuration (`edna-id.toml`)
///
/// All fields are optional so that a partial file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub novelty_threshold: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbour_count: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values compiled into the binary
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub novelty_threshold: NoveltyThreshold,
    pub neighbour_count: usize,
    pub state_dir: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    /// Defaults for the running platform
    ///
    /// State lives under the platform's local data directory
    /// (`~/.local/share/edna` on Linux), falling back to `./edna_data`.
    pub fn for_current_platform() -> Self {
        let state_dir = dirs::data_local_dir()
            .map(|d| d.join("edna"))
            .unwrap_or_else(|| PathBuf::from("./edna_data"));

        Self {
            novelty_threshold: NoveltyThreshold::DEFAULT,
            neighbour_count: DEFAULT_NEIGHBOUR_COUNT,
            state_dir,
            log_level: default_log_level(),
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub novelty_threshold: Option<f64>,
    pub neighbour_count: Option<usize>,
    pub state_dir: Option<PathBuf>,
}

/// Fully resolved configuration handed to the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub novelty_threshold: NoveltyThreshold,
    pub neighbour_count: usize,
    pub state_dir: PathBuf,
    pub log_level: String,
}

/// Default config file location: `<config_dir>/edna/edna-id.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("edna").join("edna-id.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML {} failed: {}", path.display(), e)))
}

/// Load the TOML config, degrading to defaults when the file does not exist
///
/// `path` of `None` means "use the default location".
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => {
                warn!("Could not determine config directory, using compiled defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    if !path.exists() {
        warn!(
            "Config file {} not found, using compiled defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let config = load_toml_config(&path)?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Write a TOML config atomically (temp file + rename)
///
/// On Unix the resulting file is restricted to the owner (0600).
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("toml.tmp");
    let mut file = create_private(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&temp_path, path)?;
    debug!("Wrote config to {}", path.display());
    Ok(())
}

/// Open `path` for writing with owner-only permissions from creation
#[cfg(unix)]
fn create_private(path: &Path) -> Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies to new files; a stale temp file keeps its old bits
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> Result<File> {
    Ok(OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?)
}

/// Resolves configuration across CLI, environment, TOML and defaults
pub struct ConfigResolver {
    toml: TomlConfig,
    overrides: ConfigOverrides,
}

impl ConfigResolver {
    pub fn new(toml: TomlConfig) -> Self {
        Self {
            toml,
            overrides: ConfigOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Resolve every value, validating ranges
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let defaults = &*COMPILED_DEFAULTS;

        let threshold_raw = match self.overrides.novelty_threshold {
            Some(v) => Some(v),
            None => match env_parsed::<f64>(ENV_NOVELTY_THRESHOLD)? {
                Some(v) => Some(v),
                None => self.toml.novelty_threshold,
            },
        };
        let novelty_threshold = match threshold_raw {
            Some(v) => NoveltyThreshold::new(v)
                .map_err(|e| Error::Config(format!("novelty_threshold: {}", e)))?,
            None => defaults.novelty_threshold,
        };

        let count_raw = match self.overrides.neighbour_count {
            Some(v) => Some(v),
            None => match env_parsed::<usize>(ENV_NEIGHBOUR_COUNT)? {
                Some(v) => Some(v),
                None => self.toml.neighbour_count,
            },
        };
        let neighbour_count = match count_raw {
            Some(v) => validate_neighbour_count(v)
                .map_err(|e| Error::Config(format!("neighbour_count: {}", e)))?,
            None => defaults.neighbour_count,
        };

        let state_dir = self
            .overrides
            .state_dir
            .clone()
            .or_else(|| std::env::var(ENV_STATE_DIR).ok().map(PathBuf::from))
            .or_else(|| self.toml.state_dir.clone())
            .unwrap_or_else(|| defaults.state_dir.clone());

        Ok(ResolvedConfig {
            novelty_threshold,
            neighbour_count,
            state_dir,
            log_level: self.toml.logging.level.clone(),
        })
    }
}

/// Read and parse an environment variable; unset or blank is `None`
fn env_parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has unparsable value '{}'", name, raw))),
        Err(_) => Ok(None),
    }
}
