//! Property-based tests for call-graph construction
//!
//! Invariants that should hold for ALL generated programs:
//! - Determinism: identical input and options give identical edges
//! - Soundness under budget: a partial graph has no edge the unbounded graph lacks
//! - Monotonicity: interrupted points-to sets are subsets of the converged ones
//! - Ceiling: a budgeted run never exceeds ceiling + 1 nodes

mod common;

use common::*;
use jscallgraph_core::config::{CallGraphAlgorithm, InstanceKeyMode, ReflectionMode};
use jscallgraph_core::features::call_graph::{AnalysisResult, Method};
use jscallgraph_core::features::context::Context;
use jscallgraph_core::features::points_to::{InstanceKey, PointerKey};
use jscallgraph_core::features::program::{Program, ProgramBuilder};
use jscallgraph_core::shared::VarId;
use jscallgraph_core::AnalysisOptions;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const NAMES: [&str; 4] = ["m", "n", "prototype", "__proto__"];

// ============================================================================
// Program generation
// ============================================================================

/// One generated instruction; variable operands index (modulo) the values defined so far
#[derive(Debug, Clone)]
enum Op {
    Closure(usize),
    NewObject,
    Put(usize, usize, usize),
    Get(usize, usize),
    GlobalWrite(usize, usize),
    GlobalRead(usize),
    Call(usize, usize),
    Invoke(usize, usize),
    Construct(usize),
    Return(usize),
}

fn op(functions: usize) -> impl Strategy<Value = Op> {
    let name = 0..NAMES.len();
    prop_oneof![
        (0..functions).prop_map(Op::Closure),
        Just(Op::NewObject),
        (any::<usize>(), name.clone(), any::<usize>()).prop_map(|(o, n, v)| Op::Put(o, n, v)),
        (any::<usize>(), name.clone()).prop_map(|(o, n)| Op::Get(o, n)),
        (0..2usize, any::<usize>()).prop_map(|(n, v)| Op::GlobalWrite(n, v)),
        (0..2usize).prop_map(Op::GlobalRead),
        (any::<usize>(), any::<usize>()).prop_map(|(c, a)| Op::Call(c, a)),
        (any::<usize>(), name).prop_map(|(r, n)| Op::Invoke(r, n)),
        any::<usize>().prop_map(Op::Construct),
        any::<usize>().prop_map(Op::Return),
    ]
}

/// Bodies of the script (index 0) and of up to four declared functions
fn bodies() -> impl Strategy<Value = Vec<Vec<Op>>> {
    (1..=5usize).prop_flat_map(|functions| {
        prop::collection::vec(prop::collection::vec(op(functions), 0..12), functions)
    })
}

fn build_program(bodies: &[Vec<Op>]) -> Program {
    let mut builder = ProgramBuilder::new("random.js");
    let mut ids = vec![builder.script()];
    for index in 1..bodies.len() {
        ids.push(builder.declare(&format!("f{}", index)));
    }

    for (index, body) in bodies.iter().enumerate() {
        builder.define(ids[index], |b| {
            let mut vars: Vec<VarId> = vec![b.this()];
            if index > 0 {
                vars.push(b.param());
            }
            let pick = |vars: &[VarId], i: usize| vars[i % vars.len()];

            for op in body {
                let defined = match *op {
                    Op::Closure(f) => Some(b.closure(ids[f])),
                    Op::NewObject => Some(b.new_object()),
                    Op::Put(o, n, v) => {
                        b.put(pick(&vars, o), NAMES[n], pick(&vars, v));
                        None
                    }
                    Op::Get(o, n) => Some(b.get(pick(&vars, o), NAMES[n])),
                    Op::GlobalWrite(n, v) => {
                        b.global_write(&format!("g{}", n), pick(&vars, v));
                        None
                    }
                    Op::GlobalRead(n) => Some(b.global_read(&format!("g{}", n))),
                    Op::Call(c, a) => Some(b.call(pick(&vars, c), &[pick(&vars, a)])),
                    Op::Invoke(r, n) => Some(b.invoke_property(pick(&vars, r), NAMES[n], &[])),
                    Op::Construct(c) => Some(b.construct(pick(&vars, c), &[])),
                    Op::Return(v) => {
                        b.ret(Some(pick(&vars, v)));
                        None
                    }
                };
                vars.extend(defined);
            }
        });
    }
    builder.build().expect("generated programs are well formed")
}

fn algorithm() -> impl Strategy<Value = CallGraphAlgorithm> {
    prop::sample::select(CallGraphAlgorithm::ALL.to_vec())
}

fn options() -> impl Strategy<Value = AnalysisOptions> {
    (algorithm(), any::<bool>(), any::<bool>(), 0..3usize).prop_map(
        |(algorithm, context_allocations, handle_call_apply, reflection)| {
            let reflection = [
                ReflectionMode::None,
                ReflectionMode::StringOnly,
                ReflectionMode::Full,
            ][reflection];
            AnalysisOptions::default()
                .algorithm(algorithm)
                .reflection(reflection)
                .use_constant_specific_keys(reflection == ReflectionMode::StringOnly)
                .handle_call_apply(handle_call_apply)
                .instance_keys(if context_allocations {
                    InstanceKeyMode::ContextAllocations
                } else {
                    InstanceKeyMode::AllocationSites
                })
        },
    )
}

// ============================================================================
// Comparing runs
// ============================================================================

/// Node-local and global facts keyed by run-independent names
type Facts = BTreeMap<(Option<(Method, Context)>, String), BTreeSet<InstanceKey>>;

fn facts(result: &AnalysisResult) -> Facts {
    let analysis = &result.pointer_analysis;
    let graph = &result.call_graph;
    let mut facts = Facts::new();

    for (key, set) in analysis.iter() {
        let location = match *key {
            PointerKey::Local { node, var } => graph
                .node(node)
                .map(|n| (Some((n.method, n.context)), format!("v{}", var))),
            PointerKey::Return { node } => graph
                .node(node)
                .map(|n| (Some((n.method, n.context)), "return".to_string())),
            PointerKey::Global { name } => analysis.name(name).map(|n| (None, n.to_string())),
            _ => None,
        };
        if let Some(location) = location {
            let keys = set
                .iter()
                .filter_map(|id| analysis.instance_key(id).cloned())
                .collect();
            facts.insert(location, keys);
        }
    }
    facts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_deterministic(bodies in bodies(), options in options()) {
        let program = build_program(&bodies);
        let first = analyze(&program, options.clone());
        let second = analyze(&program, options);

        prop_assert_eq!(first.call_graph.edge_keys(), second.call_graph.edge_keys());
        prop_assert_eq!(facts(&first), facts(&second));
    }

    #[test]
    fn prop_partial_graph_is_sound(bodies in bodies(), options in options(), limit in 1usize..12) {
        let program = build_program(&bodies);
        let full = analyze(&program, options.clone());
        let partial = analyze(&program, options.max_nodes(Some(limit)));

        prop_assert!(partial.call_graph.node_count() <= limit + 1);
        let full_edges = full.call_graph.edge_keys();
        for edge in partial.call_graph.edge_keys() {
            prop_assert!(full_edges.contains(&edge), "extra edge {:?}", edge);
        }
    }

    #[test]
    fn prop_points_to_monotone(bodies in bodies(), options in options(), limit in 1usize..12) {
        let program = build_program(&bodies);
        let full = facts(&analyze(&program, options.clone()));
        let partial = facts(&analyze(&program, options.max_nodes(Some(limit))));

        for (location, keys) in &partial {
            let converged = full.get(location).cloned().unwrap_or_default();
            prop_assert!(
                keys.is_subset(&converged),
                "{:?}: {:?} not within {:?}",
                location,
                keys,
                converged
            );
        }
    }

    #[test]
    fn prop_context_insensitive_has_one_node_per_method(bodies in bodies()) {
        let program = build_program(&bodies);
        let result = analyze(
            &program,
            AnalysisOptions::default().algorithm(CallGraphAlgorithm::ZeroCfa),
        );
        let graph = &result.call_graph;

        prop_assert_eq!(graph.method_count(), graph.node_count());
        prop_assert!(graph.nodes().iter().all(|n| n.context.is_everywhere()));
    }
}
