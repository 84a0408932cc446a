//! Function bodies

use super::instruction::{CallInstruction, Instruction};
use crate::shared::{FunctionId, ProgramCounter, VarId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Source position of an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One function (or script body) in SSA form
///
/// `name` follows the loader's type-name convention, e.g. `Lapp.js/outer/inner`, with the
/// script body itself named after the file (`Lapp.js`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub id: FunctionId,
    pub name: String,

    /// Source file the function was lowered from
    #[serde(default)]
    pub file: Option<String>,

    /// SSA value holding `this`
    pub this_param: VarId,

    /// SSA values holding the formal parameters, in order
    #[serde(default)]
    pub params: Vec<VarId>,

    #[serde(default)]
    pub instructions: Vec<Instruction>,

    /// Instruction index → source position
    #[serde(default)]
    pub positions: BTreeMap<ProgramCounter, Position>,
}

impl Function {
    pub fn new(id: FunctionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            file: None,
            this_param: 0,
            params: Vec::new(),
            instructions: Vec::new(),
            positions: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn instruction(&self, pc: ProgramCounter) -> Option<&Instruction> {
        self.instructions.get(pc as usize)
    }

    /// Call instruction at `pc`, if that instruction is a call
    #[inline]
    pub fn call_at(&self, pc: ProgramCounter) -> Option<&CallInstruction> {
        self.instruction(pc).and_then(Instruction::as_call)
    }

    /// All call sites in instruction order
    pub fn call_sites(&self) -> impl Iterator<Item = (ProgramCounter, &CallInstruction)> {
        self.instructions
            .iter()
            .enumerate()
            .filter_map(|(pc, inst)| inst.as_call().map(|call| (pc as ProgramCounter, call)))
    }

    #[inline]
    pub fn position(&self, pc: ProgramCounter) -> Option<Position> {
        self.positions.get(&pc).copied()
    }

    /// Method signature as printed for call targets, e.g. `app.js/f.do()LRoot;`
    pub fn signature(&self) -> String {
        format!("{}.do()LRoot;", self.name.trim_start_matches('L'))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Code body of function {}>", self.name)
    }
}
