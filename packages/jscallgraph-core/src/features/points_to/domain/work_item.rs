//! Items on the shared solver worklist

use crate::features::call_graph::domain::CallBinding;
use crate::shared::{NodeId, PointerKeyId};

/// One unit of pending work
///
/// Pointer-key propagation and call-graph growth share one queue, so newly discovered nodes
/// and targets are processed in the same order as the dataflow that found them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkItem {
    /// The points-to set of a key grew: push it along subset edges and re-evaluate constraints
    Propagate(PointerKeyId),
    /// A call-graph node was created: generate constraints for its body
    VisitNode(NodeId),
    /// A call site gained a target: bind receiver, arguments and return value
    NewTarget(CallBinding),
}
