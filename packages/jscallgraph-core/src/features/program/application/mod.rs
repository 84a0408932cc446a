//! Application layer for the program store

pub mod builder;

pub use builder::{FunctionBuilder, ProgramBuilder};
