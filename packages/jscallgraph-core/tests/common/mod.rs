//! Common test utilities for jscallgraph-core
//!
//! Shared program fixtures and call-graph assertions for the integration tests.

#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::*;
pub use fixtures::*;
