//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `MEETRANK_ROOT_FOLDER`, then `MEETRANK_ROOT` environment variable
//! 3. TOML config file (`<config_dir>/meetrank/<module>.toml`)
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or malformed config file never aborts startup: it is logged and
//! the compiled defaults are used instead.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Primary environment variable for the root folder
pub const ROOT_FOLDER_ENV: &str = "MEETRANK_ROOT_FOLDER";

/// Secondary environment variable for the root folder
pub const ROOT_ENV: &str = "MEETRANK_ROOT";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "meetrank.db";

/// Default number of ranked competitors shown per cohort
pub const DEFAULT_TOP_N: usize = 6;

/// Default listen address for the record comparison service
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8054";

/// Compiled-in defaults for the current platform
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub bind_address: String,
    pub top_n: usize,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let root_folder = dirs::data_local_dir()
            .map(|d| d.join("meetrank"))
            .unwrap_or_else(|| PathBuf::from("./meetrank_data"));

        Self {
            root_folder,
            log_level: "info".to_string(),
            log_file: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing level directive ("info", "debug", "meetrank_rc=trace", ...)
    pub level: String,
    /// Optional log file; stdout when absent
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let defaults = CompiledDefaults::for_current_platform();
        Self {
            level: defaults.log_level,
            file: defaults.log_file,
        }
    }
}

/// TOML configuration file contents
///
/// Every field is optional so older or partial files keep loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub top_n: Option<usize>,
    /// Result table file used as the persisted store instead of SQLite
    pub results_file: Option<PathBuf>,
    /// National record table file
    pub records_file: Option<PathBuf>,
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Reject values that would make the engine meaningless
    pub fn validate(&self) -> Result<()> {
        if self.top_n == Some(0) {
            return Err(Error::Config("top_n must be at least 1".to_string()));
        }
        if let Some(addr) = &self.bind_address {
            if addr.trim().is_empty() {
                return Err(Error::Config("bind_address must not be empty".to_string()));
            }
        }
        Ok(())
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// Serialize a config to a TOML file, creating parent directories
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Resolves the root folder for one module
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
        }
    }

    /// Attach the command-line override, if any
    pub fn with_cli_arg(mut self, cli_arg: Option<PathBuf>) -> Self {
        self.cli_arg = cli_arg;
        self
    }

    /// Resolve the root folder following the priority order
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        for var in [ROOT_FOLDER_ENV, ROOT_ENV] {
            if let Ok(path) = std::env::var(var) {
                if !path.trim().is_empty() {
                    return PathBuf::from(path);
                }
            }
        }

        if let Some(root_folder) = self.load_config().root_folder {
            return root_folder;
        }

        CompiledDefaults::for_current_platform().root_folder
    }

    /// Load this module's TOML config, or defaults if none is usable
    pub fn load_config(&self) -> TomlConfig {
        let Some(path) = self.config_file_path() else {
            debug!(module = %self.module_name, "No config file found, using defaults");
            return TomlConfig::default();
        };

        match load_toml_config(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                TomlConfig::default()
            }
        }
    }

    /// First existing config file for this module
    pub fn config_file_path(&self) -> Option<PathBuf> {
        let file_name = format!("{}.toml", self.module_name);

        let user_config = dirs::config_dir().map(|d| d.join("meetrank").join(&file_name));
        if let Some(path) = user_config {
            if path.exists() {
                return Some(path);
            }
        }

        if cfg!(target_os = "linux") {
            let system_config = PathBuf::from("/etc/meetrank").join(&file_name);
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }
}

/// Creates the root folder and derives paths inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Create the root folder (and parents); safe to call repeatedly
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}
