//! Ports (Interfaces) for the program store
//!
//! The engine never reads source files itself; a [`SourceLoader`] hands it a ready
//! [`Program`].

use crate::errors::Result;
use crate::features::program::domain::Program;

/// Supplies the intermediate representation and entry points for one analysis run
///
/// Implementations must return a program that passes [`Program::validate`].
pub trait SourceLoader {
    /// Produce the program to analyze
    fn load(&self) -> Result<Program>;

    /// Human-readable description of the source (file path, in-memory, ...)
    fn describe(&self) -> String;
}

/// Loader over an already constructed program
#[derive(Debug, Clone)]
pub struct InMemoryLoader {
    program: Program,
}

impl InMemoryLoader {
    pub fn new(program: Program) -> Self {
        Self { program }
    }
}

impl SourceLoader for InMemoryLoader {
    fn load(&self) -> Result<Program> {
        self.program.validate()?;
        Ok(self.program.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory program ({} functions)", self.program.len())
    }
}
