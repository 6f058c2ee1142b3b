//! Compiler wrappers (ccache, distcc, sccache)
//!
//! A wrapper runs the compiler named by its first argument. The wrapped
//! command is parsed as a GCC-like call, as if the build ran it directly.

use super::{gcc, match_file_name};
use crate::semantic::{RecognitionError, Semantic, Tool};
use crate::trace::Command;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct ToolWrapper;

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(ccache|distcc|sccache)$").expect("valid regex"))
}

impl ToolWrapper {
    /// The command the wrapper executes on behalf of the build
    fn wrapped_command(command: &Command) -> Result<Command, RecognitionError> {
        let wrapped = command.arguments.get(1..).unwrap_or_default();
        let compiler = match wrapped.first() {
            Some(compiler) if !compiler.starts_with('-') => compiler,
            _ => return Err(RecognitionError::not_a_compilation("no wrapped compiler")),
        };

        let program = if compiler.contains('/') {
            command.working_dir.join(compiler)
        } else {
            PathBuf::from(compiler)
        };

        Ok(Command {
            program,
            arguments: wrapped.to_vec(),
            working_dir: command.working_dir.clone(),
            environment: command.environment.clone(),
        })
    }
}

impl Tool for ToolWrapper {
    fn name(&self) -> &str {
        "wrapper"
    }

    fn recognize(&self, program: &Path) -> bool {
        match_file_name(pattern(), program)
    }

    fn compilations(&self, command: &Command) -> Result<Vec<Semantic>, RecognitionError> {
        let wrapped = Self::wrapped_command(command)?;
        gcc::compilations(&wrapped)
    }
}
