//! Shared module - identifiers and interning used by every feature
//!
//! Everything here is plain data with no analysis semantics.

pub mod ids;
pub mod interner;

pub use ids::{FunctionId, InstanceKeyId, NameId, NodeId, PointerKeyId, ProgramCounter, VarId};
pub use interner::Interner;
