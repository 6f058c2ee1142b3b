//! NVIDIA CUDA compiler driver

use super::{gcc, match_file_name};
use crate::semantic::{RecognitionError, Semantic, Tool};
use crate::trace::Command;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub struct ToolCuda;

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(nvcc)$").expect("valid regex"))
}

impl Tool for ToolCuda {
    fn name(&self) -> &str {
        "CUDA"
    }

    fn recognize(&self, program: &Path) -> bool {
        match_file_name(pattern(), program)
    }

    fn compilations(&self, command: &Command) -> Result<Vec<Semantic>, RecognitionError> {
        gcc::compilations(command)
    }
}
