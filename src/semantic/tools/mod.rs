//! Compiler family recognizers
//!
//! Each family matches the program's file name against its naming pattern.
//! Families that drive a GCC-like command line share [`gcc::compilations`].

pub mod clang;
pub mod cuda;
pub mod extending;
pub mod gcc;
pub mod linker;
pub mod wrapper;

pub use clang::ToolClang;
pub use cuda::ToolCuda;
pub use extending::ToolExtendingWrapper;
pub use gcc::ToolGcc;
pub use linker::ToolLinker;
pub use wrapper::ToolWrapper;

use regex::Regex;
use std::path::Path;

/// Matches the file name of `program` against `pattern`
pub(crate) fn match_file_name(pattern: &Regex, program: &Path) -> bool {
    program
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| pattern.is_match(name))
}
