//! Program Representation Store
//!
//! Read-only during analysis. Functions are addressed by dense ids equal to their index.

use super::function::Function;
use crate::errors::{CallGraphError, Result};
use crate::shared::{FunctionId, VarId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Whole program: every function plus the entry points the fake root invokes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<Function>,
    pub entry_points: Vec<FunctionId>,
}

impl Program {
    #[inline]
    pub fn function(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get(id as usize)
    }

    pub fn function_by_name(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Total number of IR instructions across all functions
    pub fn instruction_count(&self) -> usize {
        self.functions.iter().map(|f| f.instructions.len()).sum()
    }

    /// Check structural well-formedness
    ///
    /// Rejects: ids out of order, duplicate names, missing or dangling entry points,
    /// references to unknown functions, SSA values defined twice, and uses of values that are
    /// never defined.
    pub fn validate(&self) -> Result<()> {
        if self.entry_points.is_empty() {
            return Err(CallGraphError::invalid_program("no entry points"));
        }

        let mut names = FxHashSet::default();
        for (index, function) in self.functions.iter().enumerate() {
            if function.id as usize != index {
                return Err(CallGraphError::invalid_program(format!(
                    "function '{}' has id {} but is stored at index {}",
                    function.name, function.id, index
                )));
            }
            if !names.insert(function.name.as_str()) {
                return Err(CallGraphError::invalid_program(format!(
                    "duplicate function name '{}'",
                    function.name
                )));
            }
        }

        for &entry in &self.entry_points {
            if self.function(entry).is_none() {
                return Err(CallGraphError::invalid_program(format!(
                    "entry point f{} does not exist",
                    entry
                )));
            }
        }

        for function in &self.functions {
            self.validate_function(function)?;
        }

        Ok(())
    }

    fn validate_function(&self, function: &Function) -> Result<()> {
        let mut defined: FxHashSet<VarId> = FxHashSet::default();
        let mut define = |var: VarId, what: &str| -> Result<()> {
            if defined.insert(var) {
                Ok(())
            } else {
                Err(CallGraphError::invalid_program(format!(
                    "{}: v{} defined twice ({})",
                    function.name, var, what
                )))
            }
        };

        define(function.this_param, "this")?;
        for &param in &function.params {
            define(param, "parameter")?;
        }
        for (pc, inst) in function.instructions.iter().enumerate() {
            if let Some(dst) = inst.defined_var() {
                define(dst, &format!("instruction {}", pc))?;
            }
        }

        for (pc, inst) in function.instructions.iter().enumerate() {
            if let Some(referenced) = inst.referenced_function() {
                if self.function(referenced).is_none() {
                    return Err(CallGraphError::invalid_program(format!(
                        "{}: instruction {} references unknown function f{}",
                        function.name, pc, referenced
                    )));
                }
            }
            for used in inst.used_vars() {
                if !defined.contains(&used) {
                    return Err(CallGraphError::invalid_program(format!(
                        "{}: instruction {} uses undefined v{}",
                        function.name, pc, used
                    )));
                }
            }
        }

        Ok(())
    }
}
