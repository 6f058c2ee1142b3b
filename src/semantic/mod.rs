//! Semantic recognition of traced executions
//!
//! Turns the raw trace into compilation database entries:
//!
//! - [`forest`]: process ancestry with a pruning breadth first walk
//! - [`tools`]: compiler family recognizers implementing [`Tool`]
//! - [`pipeline`]: ordered dispatch of executions to the tools

pub mod flags;
pub mod forest;
pub mod pipeline;
pub mod tools;

pub use forest::Forest;
pub use pipeline::RecognitionPipeline;

use crate::output::Entry;
use crate::trace::Command;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why an execution did not produce semantic records
///
/// These are expected outcomes for most processes of a build. They make the
/// traversal continue into the children of the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    #[error("The compiler is on the exclude list from configuration: {}", .0.display())]
    Excluded(PathBuf),

    #[error("No tools recognize this command: {}", .0.display())]
    NotRecognized(PathBuf),

    #[error("Not a compilation: {reason}")]
    NotACompilation { reason: String },
}

impl RecognitionError {
    pub fn not_a_compilation(reason: impl Into<String>) -> Self {
        RecognitionError::NotACompilation {
            reason: reason.into(),
        }
    }
}

/// A compiler family recognizer
///
/// Implementations must be pure: the same program or command always gives
/// the same answer.
pub trait Tool: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Does the program belong to this family
    fn recognize(&self, program: &Path) -> bool;

    /// Semantic records for a command of this family
    fn compilations(&self, command: &Command) -> Result<Vec<Semantic>, RecognitionError>;
}

/// What a recognized execution did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Semantic {
    /// Asked the compiler about itself (version, search paths, ...)
    QueryCompiler { command: Command },
    /// Ran the preprocessor only, `output` is `None` when writing to stdout
    Preprocess {
        command: Command,
        source: PathBuf,
        output: Option<PathBuf>,
        flags: Vec<String>,
    },
    /// Compiled a single source file
    Compile {
        command: Command,
        source: PathBuf,
        output: PathBuf,
        flags: Vec<String>,
    },
}

impl Semantic {
    pub fn preprocess(
        command: &Command,
        source: &str,
        output: Option<&str>,
        flags: Vec<String>,
    ) -> Self {
        Semantic::Preprocess {
            source: make_absolute(command, source),
            output: output.map(|output| make_absolute(command, output)),
            command: command.clone(),
            flags,
        }
    }

    pub fn compile(command: &Command, source: &str, output: &str, flags: Vec<String>) -> Self {
        Semantic::Compile {
            source: make_absolute(command, source),
            output: make_absolute(command, output),
            command: command.clone(),
            flags,
        }
    }

    pub fn command(&self) -> &Command {
        match self {
            Semantic::QueryCompiler { command }
            | Semantic::Preprocess { command, .. }
            | Semantic::Compile { command, .. } => command,
        }
    }

    /// The compilation database entry for this record, if it has one
    pub fn to_entry(&self) -> Option<Entry> {
        match self {
            Semantic::Compile {
                command,
                source,
                output,
                flags,
            } => {
                let program = command
                    .arguments
                    .first()
                    .cloned()
                    .unwrap_or_else(|| command.program.to_string_lossy().into_owned());

                let mut arguments = Vec::with_capacity(flags.len() + 5);
                arguments.push(program);
                arguments.extend(flags.iter().cloned());
                // -S already names the kind of output
                if !flags.iter().any(|flag| flag == "-S") {
                    arguments.push("-c".to_string());
                }
                arguments.push("-o".to_string());
                arguments.push(output.to_string_lossy().into_owned());
                arguments.push(source.to_string_lossy().into_owned());

                Some(Entry {
                    file: source.clone(),
                    directory: command.working_dir.clone(),
                    output: Some(output.clone()),
                    arguments,
                })
            }
            Semantic::QueryCompiler { .. } | Semantic::Preprocess { .. } => None,
        }
    }
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Semantic::QueryCompiler { .. } => write!(f, "Query"),
            Semantic::Preprocess {
                source,
                output,
                flags,
                ..
            } => write!(
                f,
                "Preprocess {{ source: {}, output: {}, flags: [{}] }}",
                source.display(),
                output
                    .as_ref()
                    .map_or_else(|| "stdout".to_string(), |o| o.display().to_string()),
                flags.join(", ")
            ),
            Semantic::Compile {
                source,
                output,
                flags,
                ..
            } => write!(
                f,
                "Compile {{ source: {}, output: {}, flags: [{}] }}",
                source.display(),
                output.display(),
                flags.join(", ")
            ),
        }
    }
}

pub(crate) fn make_absolute(command: &Command, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        command.working_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gcc(arguments: &[&str]) -> Command {
        Command::new("/usr/bin/gcc", arguments.iter().copied(), "/home/user/project")
    }

    #[test]
    fn test_compile_paths_are_absolute() {
        let command = gcc(&["gcc", "-c", "src/a.c"]);
        let semantic = Semantic::compile(&command, "src/a.c", "a.o", vec![]);

        match semantic {
            Semantic::Compile { source, output, .. } => {
                assert_eq!(source, PathBuf::from("/home/user/project/src/a.c"));
                assert_eq!(output, PathBuf::from("/home/user/project/a.o"));
            }
            other => panic!("unexpected semantic: {other}"),
        }
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let command = gcc(&["gcc", "-c", "/tmp/a.c"]);
        let semantic = Semantic::compile(&command, "/tmp/a.c", "/tmp/a.o", vec![]);
        let entry = semantic.to_entry().unwrap();
        assert_eq!(entry.file, PathBuf::from("/tmp/a.c"));
        assert_eq!(entry.output, Some(PathBuf::from("/tmp/a.o")));
    }

    #[test]
    fn test_compile_to_entry() {
        let command = gcc(&["gcc", "-O2", "-c", "a.c"]);
        let semantic = Semantic::compile(&command, "a.c", "a.o", vec!["-O2".to_string()]);
        let entry = semantic.to_entry().unwrap();

        assert_eq!(entry.file, PathBuf::from("/home/user/project/a.c"));
        assert_eq!(entry.directory, PathBuf::from("/home/user/project"));
        assert_eq!(
            entry.arguments,
            vec![
                "gcc",
                "-O2",
                "-c",
                "-o",
                "/home/user/project/a.o",
                "/home/user/project/a.c"
            ]
        );
    }

    #[test]
    fn test_entry_falls_back_to_program_path() {
        let command = Command::new("/usr/bin/cc", Vec::<String>::new(), "/src");
        let semantic = Semantic::compile(&command, "a.c", "a.o", vec![]);
        let entry = semantic.to_entry().unwrap();
        assert_eq!(entry.arguments[0], "/usr/bin/cc");
    }

    #[test]
    fn test_non_compilations_have_no_entry() {
        let command = gcc(&["gcc", "--version"]);
        assert!(Semantic::QueryCompiler {
            command: command.clone()
        }
        .to_entry()
        .is_none());
        assert!(Semantic::preprocess(&command, "a.c", Some("a.i"), vec![])
            .to_entry()
            .is_none());
    }

    #[test]
    fn test_display() {
        let command = gcc(&["gcc", "-c", "a.c"]);
        let semantic = Semantic::compile(&command, "a.c", "a.o", vec!["-Wall".to_string()]);
        assert_eq!(
            semantic.to_string(),
            "Compile { source: /home/user/project/a.c, output: /home/user/project/a.o, flags: [-Wall] }"
        );
        assert_eq!(
            Semantic::QueryCompiler { command }.to_string(),
            "Query"
        );
    }

    #[test]
    fn test_error_messages() {
        let excluded = RecognitionError::Excluded(PathBuf::from("/usr/bin/cc"));
        assert!(excluded.to_string().contains("exclude list"));

        let not_compilation = RecognitionError::not_a_compilation("no source files found");
        assert_eq!(
            not_compilation.to_string(),
            "Not a compilation: no source files found"
        );
    }
}
