//! Infrastructure for the program store

pub mod json_loader;

pub use json_loader::JsonProgramLoader;
