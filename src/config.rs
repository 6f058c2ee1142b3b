//! Configuration management for compdb
//!
//! The configuration is a JSON file. Every section is optional and falls back
//! to sensible defaults, so an empty object is a valid configuration.
//!
//! # Environment Variables
//!
//! - `COMPDB_CONFIG`: configuration file used when no `--config` is given
//! - `COMPDB_LOG_LEVEL`: logging level - default: "info"
//! - `COMPDB_LOG_JSON`: JSON log output (true|false) - default: "false"
//!
//! # Example
//!
//! ```json
//! {
//!   "compilation": {
//!     "compilers_to_recognize": [
//!       { "executable": "/opt/vendor/bin/vcc", "flags_to_add": ["-D__VENDOR__"] }
//!     ],
//!     "compilers_to_exclude": ["/usr/bin/cc"]
//!   },
//!   "output": {
//!     "format": { "command_as_array": true, "drop_output_field": false },
//!     "content": { "include_only_existing_source": true, "paths_to_exclude": ["/usr"] }
//!   }
//! }
//! ```

use crate::output::{Content, Format};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "COMPDB_CONFIG";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// A compiler the built-in families do not know about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerWrapper {
    /// Absolute path of the compiler executable
    pub executable: PathBuf,
    /// Flags appended to every entry of this compiler
    #[serde(default)]
    pub flags_to_add: Vec<String>,
    /// Flags dropped from every entry of this compiler
    #[serde(default)]
    pub flags_to_remove: Vec<String>,
}

impl CompilerWrapper {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            flags_to_add: Vec::new(),
            flags_to_remove: Vec::new(),
        }
    }
}

/// Which executions are considered compilations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compilation {
    #[serde(default)]
    pub compilers_to_recognize: Vec<CompilerWrapper>,
    #[serde(default)]
    pub compilers_to_exclude: Vec<PathBuf>,
}

/// How the compilation database is written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub content: Content,
}

/// Main configuration structure for compdb
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compilation: Compilation,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Loads and validates the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by `path`, or by `COMPDB_CONFIG`, or returns defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = env::var_os(CONFIG_ENV).map(PathBuf::from);
        match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Validates the configuration
    ///
    /// Declared compilers are matched by exact path, so they must be absolute.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for compiler in &self.compilation.compilers_to_recognize {
            if compiler.executable.as_os_str().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "compilers_to_recognize contains an empty executable path".to_string(),
                ));
            }
            if !compiler.executable.is_absolute() {
                return Err(ConfigError::ValidationFailed(format!(
                    "compiler executable must be an absolute path: {}",
                    compiler.executable.display()
                )));
            }
        }
        if self
            .compilation
            .compilers_to_exclude
            .iter()
            .any(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::ValidationFailed(
                "compilers_to_exclude contains an empty path".to_string(),
            ));
        }
        Ok(())
    }
}
