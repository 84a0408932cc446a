//! Numeric identifiers
//!
//! Dense `u32` ids are used everywhere a value is interned, so that points-to sets and
//! worklists can stay as sorted integer vectors.

/// Index of a function in [`Program::functions`](crate::features::program::Program)
pub type FunctionId = u32;

/// SSA value number, local to one function
pub type VarId = u32;

/// Index of an instruction inside its function body
pub type ProgramCounter = u32;

/// Interned property / global / lexical variable name
pub type NameId = u32;

/// Call-graph node (method, context) index
pub type NodeId = u32;

/// Interned [`InstanceKey`](crate::features::points_to::InstanceKey)
pub type InstanceKeyId = u32;

/// Interned [`PointerKey`](crate::features::points_to::PointerKey)
pub type PointerKeyId = u32;
