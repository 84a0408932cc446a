//! Outcome of a call-graph construction run

use crate::features::call_graph::domain::CallGraph;
use crate::features::call_graph::ports::CancelReason;
use crate::features::points_to::PointerAnalysis;
use std::fmt;
use std::time::Duration;

/// Why a run stopped before the fixpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Node creation refused at the ceiling
    NodeBudget { limit: usize },
    /// The progress monitor asked to stop
    Canceled(CancelReason),
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::NodeBudget { limit } => {
                write!(f, "node ceiling of {} reached", limit)
            }
            TerminationReason::Canceled(reason) => reason.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Fixpoint reached
    Complete,
    /// Stopped early; every edge present is also in the complete graph
    Partial(TerminationReason),
}

impl Completion {
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, Completion::Complete)
    }

    pub fn reason(&self) -> Option<TerminationReason> {
        match self {
            Completion::Complete => None,
            Completion::Partial(reason) => Some(*reason),
        }
    }
}

/// Counters of a construction run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Worklist items processed
    pub iterations: usize,
    /// Node bodies turned into constraints
    pub visited_nodes: usize,
    pub pointer_keys: usize,
    pub instance_keys: usize,
    pub points_to_facts: usize,
    pub subset_edges: usize,
    pub constraints: usize,
    pub elapsed: Duration,
}

/// Frozen result handed to the output stage
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub call_graph: CallGraph,
    pub pointer_analysis: PointerAnalysis,
    pub completion: Completion,
    pub stats: BuildStats,
}

impl AnalysisResult {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.completion.is_complete()
    }
}
