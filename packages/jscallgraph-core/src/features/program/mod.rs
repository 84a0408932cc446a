//! # Program Representation Store
//!
//! Per-function SSA instructions and the entry points of the analyzed script. Prototype
//! relationships are not stored separately: they arise from `prototype` property writes and
//! `new` expressions, and are discovered by the pointer analysis.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{FunctionBuilder, ProgramBuilder};
pub use domain::{
    CallInstruction, CallKind, ConstantValue, Function, Instruction, Position, Program,
};
pub use infrastructure::JsonProgramLoader;
pub use ports::{InMemoryLoader, SourceLoader};
