//! compdb - compilation database generator
//!
//! This library turns the trace of a build (every process the build started,
//! with its arguments, working directory and parent) into a JSON compilation
//! database as consumed by clang tooling.
//!
//! # Core Concepts
//!
//! - **Report**: the traced executions, loaded from the tracer's JSON output
//! - **Forest**: the executions arranged by parent process, repaired when
//!   parents are missing from the trace
//! - **Tool**: a compiler family (GCC, clang, CUDA, wrappers, linkers) that
//!   recognizes a program and extracts what it compiled
//! - **RecognitionPipeline**: the ordered tools walked over the forest. Once a
//!   process is recognized, its children are not looked at.
//!
//! # Example Usage
//!
//! ```no_run
//! use compdb::{CompilationDatabase, RecognitionPipeline, Report};
//! use std::path::Path;
//!
//! fn generate() -> anyhow::Result<()> {
//!     let report = Report::load(Path::new("events.json"))?;
//!     let entries = RecognitionPipeline::default().transform(&report);
//!     CompilationDatabase::default().to_json(Path::new("compile_commands.json"), &entries)?;
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`trace`]: execution report types
//! - [`semantic`]: forest, compiler families and the recognition pipeline
//! - [`output`]: compilation database entries, writer, reader and merge
//! - [`config`]: JSON configuration
//! - [`cli`]: command line front end

pub mod cli;
pub mod config;
pub mod output;
pub mod semantic;
pub mod trace;
pub mod util;

pub use config::{Compilation, CompilerWrapper, Config, ConfigError};
pub use output::{CompilationDatabase, Content, Entry, Format, OutputError};
pub use semantic::{Forest, RecognitionError, RecognitionPipeline, Semantic, Tool};
pub use trace::{Command, Execution, Pid, Report};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
