/*
 * jscallgraph - Context-Sensitive Call Graphs for JavaScript IR
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Ids and interning
 * - config/      : Analysis options, YAML config files
 * - features/    : Vertical slices (program → points_to ⇄ call_graph → driver)
 * - errors.rs    : Crate error type
 *
 * Single-threaded worklist solver; cancellation through an atomic flag plus deadline.
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::too_many_arguments)] // Constraint generation helpers take many params

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Ids and interning
pub mod shared;

/// Analysis configuration
pub mod config;

/// Crate error type
pub mod errors;

/// Feature modules
pub mod features;

// ═══════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{
    AnalysisOptions, CallGraphAlgorithm, ConfigError, ConfigFileV1, InstanceKeyMode,
    ReflectionMode,
};
pub use errors::{CallGraphError, Result};
pub use features::call_graph::{
    AnalysisResult, CallGraph, CallGraphBuilder, CallGraphNode, CancelReason, Completion,
    Method, NullMonitor, ProgressMonitor, TerminationReason,
};
pub use features::context::{Context, ContextSelector, InstanceKeyPolicy};
pub use features::driver::{
    AnalysisDriver, CallGraphStats, CancelHandle, EdgeListWriter, OutputOptions,
    TimeoutMonitor,
};
pub use features::points_to::{InstanceKey, PointerAnalysis, PointerKey};
pub use features::program::{
    JsonProgramLoader, Program, ProgramBuilder, SourceLoader,
};
