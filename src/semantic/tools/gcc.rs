//! GCC and GCC-compatible drivers

use super::match_file_name;
use crate::semantic::flags::{self, CompilerFlag, FlagKind};
use crate::semantic::{RecognitionError, Semantic, Tool};
use crate::trace::Command;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct ToolGcc;

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(cc|c\+\+|cxx|CC|(([^-]*-)*([mg](cc|\+\+)|[g]?fortran)(-?\d+(\.\d+){0,2})?))$")
            .expect("valid regex")
    })
}

impl Tool for ToolGcc {
    fn name(&self) -> &str {
        "GCC"
    }

    fn recognize(&self, program: &Path) -> bool {
        match_file_name(pattern(), program)
    }

    fn compilations(&self, command: &Command) -> Result<Vec<Semantic>, RecognitionError> {
        compilations(command)
    }
}

/// Semantic records of a GCC-like command line
pub fn compilations(command: &Command) -> Result<Vec<Semantic>, RecognitionError> {
    let arguments = command.arguments.get(1..).unwrap_or_default();
    if arguments.is_empty() {
        return Err(RecognitionError::not_a_compilation("no arguments found"));
    }

    let parsed = flags::parse(arguments);
    let sources: Vec<&str> = parsed
        .iter()
        .filter(|f| f.kind == FlagKind::Source)
        .map(|f| f.name())
        .collect();

    let is_query = parsed.iter().any(|f| f.kind == FlagKind::KindOfOutputInfo);
    if sources.is_empty() {
        return if is_query {
            Ok(vec![Semantic::QueryCompiler {
                command: command.clone(),
            }])
        } else {
            Err(RecognitionError::not_a_compilation("no source files found"))
        };
    }

    let has_flag = |name: &str| parsed.iter().any(|f| f.name() == name);
    let output = parsed
        .iter()
        .filter(|f| f.kind == FlagKind::KindOfOutputOutput)
        .filter_map(|f| f.value("-o"))
        .last();
    let no_linking = has_flag("-c") || has_flag("-S");
    let preprocess_only = has_flag("-E")
        || ((has_flag("-M") || has_flag("-MM")) && !(has_flag("-MD") || has_flag("-MMD")));

    let retained = retained_flags(&parsed);

    let semantics = sources
        .iter()
        .map(|source| {
            if preprocess_only {
                let output = match (output, sources.len()) {
                    (Some(output), 1) if output != "-" => Some(output),
                    _ => None,
                };
                Semantic::preprocess(command, source, output, retained.clone())
            } else {
                let output = match (output, sources.len()) {
                    (Some(output), 1) if no_linking => output.to_string(),
                    _ => object_name(source),
                };
                Semantic::compile(command, source, &output, retained.clone())
            }
        })
        .collect();
    Ok(semantics)
}

/// Flags passed through to the compilation database entry
fn retained_flags(parsed: &[CompilerFlag]) -> Vec<String> {
    parsed
        .iter()
        .filter(|f| match f.kind {
            FlagKind::Source
            | FlagKind::KindOfOutputOutput
            | FlagKind::Linker
            | FlagKind::LinkerObjectFile
            | FlagKind::DirectorySearchLinker => false,
            FlagKind::KindOfOutputNoLinking => f.name() != "-c",
            _ => true,
        })
        .flat_map(|f| f.arguments.iter().cloned())
        .collect()
}

/// Object file the driver writes for a source when no output is named
fn object_name(source: &str) -> String {
    let stem = Path::new(source)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string());
    format!("{stem}.o")
}
