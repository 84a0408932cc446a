//! Call graph
//!
//! Nodes are (method, context) pairs created lazily by the builder. Each node owns its call
//! sites; a site maps to the set of callee nodes discovered so far. Once the builder is done
//! the graph is handed out by value and only the read API remains reachable.

use super::call_site::CallSiteReference;
use crate::features::context::Context;
use crate::features::points_to::domain::Builtin;
use crate::features::program::Program;
use crate::shared::{FunctionId, NodeId, ProgramCounter};
use petgraph::graph::DiGraph;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Id of the synthetic root node
pub const FAKE_ROOT: NodeId = 0;

/// Code a node analyzes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Method {
    /// Synthetic root invoking every entry point
    FakeRoot,
    Function(FunctionId),
    /// Builtin body (reached when call/apply rewriting is off)
    Builtin(Builtin),
    /// Stand-in callee of call sites that resolved to nothing
    Unknown,
}

impl Method {
    #[inline]
    pub fn function(&self) -> Option<FunctionId> {
        match self {
            Method::Function(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Method::FakeRoot | Method::Unknown)
    }

    /// Rendering used for the caller column of the edge listing
    pub fn render(&self, program: &Program) -> String {
        match self {
            Method::FakeRoot => "synthetic < JavaScriptLoader, LFakeRoot, fakeRootMethod()V >".into(),
            Method::Unknown => "synthetic < JavaScriptLoader, LUnknownTarget, unknown()V >".into(),
            Method::Builtin(b) => format!("<Code body of function {}>", b.name()),
            Method::Function(f) => match program.function(*f) {
                Some(function) => function.to_string(),
                None => format!("<Code body of function f{}>", f),
            },
        }
    }

    /// Rendering used for the callee column of the edge listing
    pub fn signature(&self, program: &Program) -> String {
        match self {
            Method::FakeRoot => "FakeRoot.fakeRootMethod()V".into(),
            Method::Unknown => "UnknownTarget.unknown()V".into(),
            Method::Builtin(b) => {
                let name = b.name();
                format!("{}.do()LRoot;", name.strip_prefix('L').unwrap_or(name))
            }
            Method::Function(f) => match program.function(*f) {
                Some(function) => function.signature(),
                None => format!("f{}.do()LRoot;", f),
            },
        }
    }
}

/// One analysis instance of a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallGraphNode {
    pub id: NodeId,
    pub method: Method,
    pub context: Context,
}

/// Edge in node-id terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallEdge {
    pub caller: NodeId,
    pub site: CallSiteReference,
    pub callee: NodeId,
}

/// Edge in terms independent of node numbering, for comparing graphs of different runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub caller: (Method, Context),
    pub pc: ProgramCounter,
    pub callee: (Method, Context),
}

#[derive(Debug, Clone)]
struct SiteTargets {
    site: CallSiteReference,
    targets: BTreeSet<NodeId>,
}

#[derive(Debug, Clone)]
pub struct CallGraph {
    nodes: Vec<CallGraphNode>,
    index: FxHashMap<(Method, Context), NodeId>,
    /// Per node, sites by program counter
    sites: Vec<BTreeMap<ProgramCounter, SiteTargets>>,
    edge_count: usize,
    unknown: Option<NodeId>,
    complete: bool,
}

impl CallGraph {
    /// Empty graph holding only the fake root
    pub(crate) fn new() -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            index: FxHashMap::default(),
            sites: Vec::new(),
            edge_count: 0,
            unknown: None,
            complete: false,
        };
        graph.add_node(Method::FakeRoot, Context::Everywhere);
        graph
    }

    /// Get or create the node for `(method, context)`; the flag is true if it was created
    pub(crate) fn add_node(&mut self, method: Method, context: Context) -> (NodeId, bool) {
        if let Some(&id) = self.index.get(&(method, context)) {
            return (id, false);
        }
        let id = self.nodes.len() as NodeId;
        self.nodes.push(CallGraphNode {
            id,
            method,
            context,
        });
        self.sites.push(BTreeMap::new());
        self.index.insert((method, context), id);
        (id, true)
    }

    /// Register a call site of `node` (idempotent)
    pub(crate) fn add_site(&mut self, node: NodeId, site: CallSiteReference) {
        if let Some(sites) = self.sites.get_mut(node as usize) {
            sites.entry(site.pc).or_insert_with(|| SiteTargets {
                site,
                targets: BTreeSet::new(),
            });
        }
    }

    /// Add `caller@site → callee`, returning true if the edge is new
    pub(crate) fn add_edge(
        &mut self,
        caller: NodeId,
        site: CallSiteReference,
        callee: NodeId,
    ) -> bool {
        let Some(sites) = self.sites.get_mut(caller as usize) else {
            return false;
        };
        let entry = sites.entry(site.pc).or_insert_with(|| SiteTargets {
            site,
            targets: BTreeSet::new(),
        });
        let added = entry.targets.insert(callee);
        if added {
            self.edge_count += 1;
        }
        added
    }

    /// Freeze the graph
    ///
    /// Only a complete graph routes unresolved sites to the unknown-target node: in a partial
    /// graph an empty site may simply not have been reached yet.
    pub(crate) fn seal(&mut self, complete: bool) {
        self.complete = complete;
        if !complete {
            return;
        }
        let unresolved: Vec<(NodeId, CallSiteReference)> = self
            .sites
            .iter()
            .enumerate()
            .flat_map(|(node, sites)| {
                sites
                    .values()
                    .filter(|s| s.targets.is_empty())
                    .map(move |s| (node as NodeId, s.site))
            })
            .collect();
        if unresolved.is_empty() {
            return;
        }
        let (unknown, _) = self.add_node(Method::Unknown, Context::Everywhere);
        self.unknown = Some(unknown);
        for (node, site) in unresolved {
            self.add_edge(node, site, unknown);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn fake_root(&self) -> NodeId {
        FAKE_ROOT
    }

    /// Node standing in for unresolved targets, if any site needed it
    #[inline]
    pub fn unknown_target(&self) -> Option<NodeId> {
        self.unknown
    }

    /// Whether the fixpoint was reached
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&CallGraphNode> {
        self.nodes.get(id as usize)
    }

    #[inline]
    pub fn nodes(&self) -> &[CallGraphNode] {
        &self.nodes
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn find_node(&self, method: Method, context: Context) -> Option<NodeId> {
        self.index.get(&(method, context)).copied()
    }

    /// Every node analyzing `function`, in creation order
    pub fn nodes_for_function(&self, function: FunctionId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.method == Method::Function(function))
            .map(|n| n.id)
            .collect()
    }

    /// Number of distinct methods with at least one node
    pub fn method_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| n.method)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Call sites of `node` with their targets, by program counter
    pub fn call_sites(
        &self,
        node: NodeId,
    ) -> impl Iterator<Item = (CallSiteReference, &BTreeSet<NodeId>)> + '_ {
        self.sites
            .get(node as usize)
            .into_iter()
            .flat_map(|sites| sites.values().map(|s| (s.site, &s.targets)))
    }

    pub fn targets(&self, node: NodeId, pc: ProgramCounter) -> Option<&BTreeSet<NodeId>> {
        self.sites
            .get(node as usize)
            .and_then(|sites| sites.get(&pc))
            .map(|s| &s.targets)
    }

    /// Callee nodes over all sites of `node`
    pub fn successors(&self, node: NodeId) -> BTreeSet<NodeId> {
        self.call_sites(node)
            .flat_map(|(_, targets)| targets.iter().copied())
            .collect()
    }

    /// Every edge, ordered by caller id, program counter, callee id
    pub fn edges(&self) -> impl Iterator<Item = CallEdge> + '_ {
        self.sites.iter().enumerate().flat_map(|(caller, sites)| {
            sites.values().flat_map(move |s| {
                s.targets.iter().map(move |&callee| CallEdge {
                    caller: caller as NodeId,
                    site: s.site,
                    callee,
                })
            })
        })
    }

    /// Edge set keyed by (method, context) rather than node ids
    pub fn edge_keys(&self) -> BTreeSet<EdgeKey> {
        self.edges()
            .filter_map(|edge| {
                let caller = self.node(edge.caller)?;
                let callee = self.node(edge.callee)?;
                Some(EdgeKey {
                    caller: (caller.method, caller.context),
                    pc: edge.site.pc,
                    callee: (callee.method, callee.context),
                })
            })
            .collect()
    }

    /// Export as a petgraph graph; node indices equal node ids
    pub fn to_petgraph(&self) -> DiGraph<CallGraphNode, CallSiteReference> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edge_count);
        let indices: Vec<_> = self.nodes.iter().map(|n| graph.add_node(*n)).collect();
        for edge in self.edges() {
            graph.add_edge(
                indices[edge.caller as usize],
                indices[edge.callee as usize],
                edge.site,
            );
        }
        graph
    }
}
