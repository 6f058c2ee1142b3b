//! Stand-alone linkers
//!
//! Linking is not tracked, so a pure link step is not a compilation and the
//! traversal looks at what the linker ran. A linker handed source files
//! (or asked for its version) is parsed like a GCC-like driver.

use super::{gcc, match_file_name};
use crate::semantic::{RecognitionError, Semantic, Tool};
use crate::trace::Command;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub struct ToolLinker;

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(([^-]*-)*(ld(\.(bfd|gold|lld))?|lld|ld64(\.lld)?|gold|mold))$")
            .expect("valid regex")
    })
}

impl Tool for ToolLinker {
    fn name(&self) -> &str {
        "linker"
    }

    fn recognize(&self, program: &Path) -> bool {
        match_file_name(pattern(), program)
    }

    fn compilations(&self, command: &Command) -> Result<Vec<Semantic>, RecognitionError> {
        gcc::compilations(command)
    }
}
