//! Compilation database output
//!
//! This module defines the compilation database entry and the options which
//! control how entries are written:
//!
//! - [`Format`]: the shape of each JSON entry
//! - [`Content`]: which entries make it into the file
//! - [`CompilationDatabase`]: reading, writing and merging databases

mod database;
mod shell;

pub use database::{merge, CompilationDatabase};
pub use shell::{join, split};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One compiled file of the compilation database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Absolute path of the compiled source file
    pub file: PathBuf,
    /// Working directory of the compilation
    pub directory: PathBuf,
    /// Output artifact, when known
    pub output: Option<PathBuf>,
    /// Effective command line, starting with the compiler
    pub arguments: Vec<String>,
}

impl Entry {
    /// Checks the entry can be written and read back
    pub fn validate(&self) -> Result<(), OutputError> {
        if self.file.as_os_str().is_empty() {
            return Err(OutputError::Validation("Field 'file' is empty string.".to_string()));
        }
        if self.directory.as_os_str().is_empty() {
            return Err(OutputError::Validation(
                "Field 'directory' is empty string.".to_string(),
            ));
        }
        if matches!(&self.output, Some(output) if output.as_os_str().is_empty()) {
            return Err(OutputError::Validation("Field 'output' is empty string.".to_string()));
        }
        if self.arguments.is_empty() {
            return Err(OutputError::Validation("Field 'arguments' is empty list.".to_string()));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

/// Shape of the written JSON entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    /// Write `arguments` as an array instead of a `command` string
    #[serde(default = "default_true")]
    pub command_as_array: bool,
    /// Leave out the `output` field
    #[serde(default)]
    pub drop_output_field: bool,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            command_as_array: true,
            drop_output_field: false,
        }
    }
}

/// Filter applied to entries before they are written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Only write entries whose source exists and passes the path filters
    #[serde(default)]
    pub include_only_existing_source: bool,
    #[serde(default)]
    pub paths_to_include: Vec<PathBuf>,
    #[serde(default)]
    pub paths_to_exclude: Vec<PathBuf>,
}

impl Content {
    pub fn accepts(&self, entry: &Entry) -> bool {
        if !self.include_only_existing_source {
            return true;
        }
        let exists = entry.file.exists();
        let to_include =
            self.paths_to_include.is_empty() || contains(&self.paths_to_include, &entry.file);
        let to_exclude =
            !self.paths_to_exclude.is_empty() && contains(&self.paths_to_exclude, &entry.file);

        exists && to_include && !to_exclude
    }
}

/// Is `file` under any of the `directories`, compared component by component
fn contains(directories: &[PathBuf], file: &Path) -> bool {
    directories.iter().any(|directory| file.starts_with(directory))
}

/// Errors reading or writing a compilation database
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to access file: {path}, cause: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write compilation database: {0}")]
    Write(#[source] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid entry: {0}")]
    Validation(String),

    #[error("Failed to split command: {0}")]
    Shell(String),
}
