//! Clang driver

use super::{gcc, match_file_name};
use crate::semantic::{RecognitionError, Semantic, Tool};
use crate::trace::Command;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub struct ToolClang;

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(([^-]*-)*clang(\+\+)?(-?\d+(\.\d+){0,2})?)$").expect("valid regex")
    })
}

impl Tool for ToolClang {
    fn name(&self) -> &str {
        "clang"
    }

    fn recognize(&self, program: &Path) -> bool {
        match_file_name(pattern(), program)
    }

    fn compilations(&self, command: &Command) -> Result<Vec<Semantic>, RecognitionError> {
        gcc::compilations(command)
    }
}
