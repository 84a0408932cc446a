//! Call-graph construction

pub mod builder;
pub mod result;

pub use builder::CallGraphBuilder;
pub use result::{AnalysisResult, BuildStats, Completion, TerminationReason};
