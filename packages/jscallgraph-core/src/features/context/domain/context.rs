//! Calling contexts
//!
//! A context distinguishes analysis instances of the same function. Only call strings of
//! length 0 (`Everywhere`) and 1 are needed by the shipped selectors.

use crate::features::program::Program;
use crate::shared::{FunctionId, ProgramCounter};
use serde::{Deserialize, Serialize};

/// The call site a length-1 call string remembers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallString {
    /// Function containing the call
    pub caller: FunctionId,
    /// Call instruction inside `caller`
    pub pc: ProgramCounter,
}

/// Calling context of a call-graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Context {
    /// Context-insensitive
    Everywhere,
    /// Immediate caller site
    CallString(CallString),
}

impl Default for Context {
    fn default() -> Self {
        Context::Everywhere
    }
}

impl Context {
    /// Length-1 call string for a call at `pc` in `caller`
    #[inline]
    pub fn call_string(caller: FunctionId, pc: ProgramCounter) -> Self {
        Context::CallString(CallString { caller, pc })
    }

    #[inline]
    pub fn is_everywhere(&self) -> bool {
        matches!(self, Context::Everywhere)
    }

    /// Call-string length
    #[inline]
    pub fn depth(&self) -> usize {
        match self {
            Context::Everywhere => 0,
            Context::CallString(_) => 1,
        }
    }

    /// Render the way the call-graph output prints contexts
    pub fn render(&self, program: &Program) -> String {
        match self {
            Context::Everywhere => "Everywhere".to_string(),
            Context::CallString(cs) => {
                let caller = program
                    .function(cs.caller)
                    .map(|f| f.signature())
                    .unwrap_or_else(|| format!("f{}", cs.caller));
                format!("CallStringContext: [ {}@{} ]", caller, cs.pc)
            }
        }
    }
}
