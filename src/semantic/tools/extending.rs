//! User declared compilers
//!
//! The configuration can name compilers the built-in families do not know
//! about. They are treated as GCC-like, with optional flag adjustments.

use super::gcc;
use crate::config::CompilerWrapper;
use crate::semantic::{RecognitionError, Semantic, Tool};
use crate::trace::Command;
use std::path::Path;

pub struct ToolExtendingWrapper {
    compiler: CompilerWrapper,
}

impl ToolExtendingWrapper {
    pub fn new(compiler: CompilerWrapper) -> Self {
        Self { compiler }
    }

    fn adjust(&self, flags: Vec<String>) -> Vec<String> {
        flags
            .into_iter()
            .filter(|flag| !self.compiler.flags_to_remove.contains(flag))
            .chain(self.compiler.flags_to_add.iter().cloned())
            .collect()
    }
}

impl Tool for ToolExtendingWrapper {
    fn name(&self) -> &str {
        "extending wrapper"
    }

    fn recognize(&self, program: &Path) -> bool {
        program == self.compiler.executable
    }

    fn compilations(&self, command: &Command) -> Result<Vec<Semantic>, RecognitionError> {
        let semantics = gcc::compilations(command)?
            .into_iter()
            .map(|semantic| match semantic {
                Semantic::Compile {
                    command,
                    source,
                    output,
                    flags,
                } => Semantic::Compile {
                    command,
                    source,
                    output,
                    flags: self.adjust(flags),
                },
                Semantic::Preprocess {
                    command,
                    source,
                    output,
                    flags,
                } => Semantic::Preprocess {
                    command,
                    source,
                    output,
                    flags: self.adjust(flags),
                },
                other => other,
            })
            .collect();
        Ok(semantics)
    }
}
