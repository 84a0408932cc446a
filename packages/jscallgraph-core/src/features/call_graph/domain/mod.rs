//! Domain models for the call graph

pub mod call_graph;
pub mod call_site;

pub use call_graph::{CallEdge, CallGraph, CallGraphNode, EdgeKey, Method, FAKE_ROOT};
pub use call_site::{CallBinding, CallSiteReference};
