//! JSON IR document loader
//!
//! Document shape:
//!
//! ```json
//! {
//!   "functions": [
//!     { "id": 0, "name": "Lapp.js", "this_param": 0,
//!       "instructions": [ { "op": "new_object", "dst": 1 } ] }
//!   ],
//!   "entry_points": [0]
//! }
//! ```

use crate::errors::Result;
use crate::features::program::domain::Program;
use crate::features::program::ports::SourceLoader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Loads a [`Program`] from a JSON file produced by a front-end
#[derive(Debug, Clone)]
pub struct JsonProgramLoader {
    path: PathBuf,
}

impl JsonProgramLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse and validate a document held in memory
    pub fn parse_str(content: &str) -> Result<Program> {
        let program: Program = serde_json::from_str(content)?;
        program.validate()?;
        Ok(program)
    }
}

impl SourceLoader for JsonProgramLoader {
    fn load(&self) -> Result<Program> {
        debug!(path = %self.path.display(), "reading IR document");
        let content = std::fs::read_to_string(&self.path)?;
        let program = Self::parse_str(&content)?;
        info!(
            path = %self.path.display(),
            functions = program.len(),
            instructions = program.instruction_count(),
            "loaded program"
        );
        Ok(program)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
