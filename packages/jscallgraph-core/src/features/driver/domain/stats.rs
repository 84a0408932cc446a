//! Call-graph statistics printed after construction

use crate::features::call_graph::{AnalysisResult, Completion};
use crate::features::program::Program;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallGraphStats {
    pub nodes: usize,
    pub edges: usize,
    /// Distinct methods with at least one node
    pub methods: usize,
    /// IR instructions over the distinct functions analyzed
    pub instructions: usize,
    pub pointer_keys: usize,
    pub instance_keys: usize,
    pub elapsed_ms: u128,
    /// `None` when complete, else why the run stopped
    pub stopped: Option<String>,
}

impl CallGraphStats {
    pub fn collect(result: &AnalysisResult, program: &Program) -> Self {
        let graph = &result.call_graph;
        let functions: BTreeSet<_> = graph
            .nodes()
            .iter()
            .filter_map(|n| n.method.function())
            .collect();
        let instructions = functions
            .iter()
            .filter_map(|&f| program.function(f))
            .map(|f| f.instructions.len())
            .sum();

        Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            methods: graph.method_count(),
            instructions,
            pointer_keys: result.stats.pointer_keys,
            instance_keys: result.stats.instance_keys,
            elapsed_ms: result.stats.elapsed.as_millis(),
            stopped: match result.completion {
                Completion::Complete => None,
                Completion::Partial(reason) => Some(reason.to_string()),
            },
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.stopped.is_none()
    }
}

impl fmt::Display for CallGraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Call graph stats:")?;
        writeln!(f, "  Nodes: {}", self.nodes)?;
        writeln!(f, "  Edges: {}", self.edges)?;
        writeln!(f, "  Methods: {}", self.methods)?;
        writeln!(f, "  IR instructions: {}", self.instructions)?;
        writeln!(f, "  Pointer keys: {}", self.pointer_keys)?;
        writeln!(f, "  Instance keys: {}", self.instance_keys)?;
        writeln!(f, "  Time: {}ms", self.elapsed_ms)?;
        match &self.stopped {
            None => write!(f, "  Status: complete"),
            Some(reason) => write!(f, "  Status: partial ({})", reason),
        }
    }
}
