//! Domain models for the program representation store

pub mod function;
pub mod instruction;
pub mod program;

pub use function::{Function, Position};
pub use instruction::{CallInstruction, CallKind, ConstantValue, Instruction};
pub use program::Program;
