//! Domain models for calling contexts

pub mod context;

pub use context::{CallString, Context};
