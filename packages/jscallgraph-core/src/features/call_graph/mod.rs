//! # Call-Graph Builder / Dispatch Resolver
//!
//! Grows a context-sensitive call graph on top of the points-to engine:
//! - **Nodes**: (method, context) pairs, created lazily when a context first reaches a method
//! - **Dispatch**: property lookup along `__proto__`, plus rewriting of
//!   `Function.prototype.call` / `apply` into dispatch on the function they are invoked on
//! - **Termination**: node ceiling and a cooperative [`ProgressMonitor`]; stopping early
//!   yields a partial graph whose edges all appear in the complete one
//!
//! ## Usage
//! ```text
//! let builder = CallGraphBuilder::new(&program, AnalysisOptions::default())?;
//! let result = builder.build(&NullMonitor);
//! for edge in result.call_graph.edges() { ... }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{AnalysisResult, BuildStats, CallGraphBuilder, Completion, TerminationReason};
pub use domain::{
    CallBinding, CallEdge, CallGraph, CallGraphNode, CallSiteReference, EdgeKey, Method,
    FAKE_ROOT,
};
pub use infrastructure::{DispatchResolver, DispatchTarget};
pub use ports::{CancelReason, NullMonitor, ProgressMonitor};
