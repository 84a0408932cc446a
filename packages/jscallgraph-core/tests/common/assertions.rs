//! Call-graph assertions

use jscallgraph_core::features::call_graph::{AnalysisResult, CallGraph, Method};
use jscallgraph_core::features::program::Program;
use jscallgraph_core::shared::{NodeId, ProgramCounter};
use jscallgraph_core::{AnalysisOptions, CallGraphBuilder, NullMonitor};
use std::collections::BTreeSet;

/// Build under `options` with no cancellation
pub fn analyze(program: &Program, options: AnalysisOptions) -> AnalysisResult {
    CallGraphBuilder::new(program, options)
        .expect("valid options and program")
        .build(&NullMonitor)
}

/// Nodes analyzing the function named `name`
pub fn nodes_of(graph: &CallGraph, program: &Program, name: &str) -> Vec<NodeId> {
    let function = program
        .function_by_name(name)
        .unwrap_or_else(|| panic!("no function {}", name));
    graph.nodes_for_function(function.id)
}

/// The single node of `name`
pub fn single_node(graph: &CallGraph, program: &Program, name: &str) -> NodeId {
    let nodes = nodes_of(graph, program, name);
    assert_eq!(nodes.len(), 1, "expected one node for {}, got {:?}", name, nodes);
    nodes[0]
}

/// Methods (ignoring contexts) a site resolves to
pub fn target_methods(graph: &CallGraph, node: NodeId, pc: ProgramCounter) -> BTreeSet<Method> {
    graph
        .targets(node, pc)
        .into_iter()
        .flatten()
        .filter_map(|&t| graph.node(t))
        .map(|n| n.method)
        .collect()
}

/// Names of the functions a site resolves to
pub fn target_names(
    graph: &CallGraph,
    program: &Program,
    node: NodeId,
    pc: ProgramCounter,
) -> BTreeSet<String> {
    target_methods(graph, node, pc)
        .into_iter()
        .filter_map(|m| m.function())
        .filter_map(|f| program.function(f))
        .map(|f| f.name.clone())
        .collect()
}

/// Every edge of `partial` appears in `full`
pub fn assert_edges_subset(partial: &CallGraph, full: &CallGraph) {
    let full_edges = full.edge_keys();
    for edge in partial.edge_keys() {
        assert!(
            full_edges.contains(&edge),
            "edge {:?} of the partial graph is missing from the complete graph",
            edge
        );
    }
}
