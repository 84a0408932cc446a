//! End-to-end call-graph construction scenarios
//!
//! Each test builds a small program, runs the builder under one or more configurations and
//! checks the resulting nodes and edges.

mod common;

use common::*;
use jscallgraph_core::config::{CallGraphAlgorithm, InstanceKeyMode, ReflectionMode};
use jscallgraph_core::features::context::Context;
use jscallgraph_core::features::points_to::{InstanceKey, ObjectKind, PointerKey, Property};
use jscallgraph_core::features::program::ProgramBuilder;
use jscallgraph_core::AnalysisOptions;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn options(algorithm: CallGraphAlgorithm) -> AnalysisOptions {
    AnalysisOptions::default().algorithm(algorithm)
}

// ============================================================================
// Context sensitivity
// ============================================================================

#[test]
fn test_two_call_sites_split_only_under_one_cfa() {
    let program = fixture_two_receivers();

    let expected = [
        (CallGraphAlgorithm::ZeroCfa, 1),
        (CallGraphAlgorithm::ZeroOneCfa, 1),
        (CallGraphAlgorithm::OneCfa, 2),
    ];
    for (algorithm, count) in expected {
        let result = analyze(&program, options(algorithm));
        let nodes = nodes_of(&result.call_graph, &program, "Lapp.js/f");
        assert_eq!(nodes.len(), count, "{}", algorithm);
    }
}

#[test]
fn test_one_cfa_contexts_name_the_call_sites() {
    let program = fixture_two_receivers();
    let result = analyze(&program, options(CallGraphAlgorithm::OneCfa));
    let graph = &result.call_graph;
    let main = program.function_by_name("Lapp.js").unwrap().id;

    let contexts: BTreeSet<Context> = nodes_of(graph, &program, "Lapp.js/f")
        .into_iter()
        .map(|n| graph.node(n).unwrap().context)
        .collect();
    assert_eq!(
        contexts,
        BTreeSet::from([Context::call_string(main, 6), Context::call_string(main, 8)])
    );
}

#[test]
fn test_one_cfa_keeps_receivers_apart() {
    let program = fixture_two_receivers();
    let result = analyze(&program, options(CallGraphAlgorithm::OneCfa));
    let graph = &result.call_graph;

    // f returns `this`; each context sees only its own receiver
    for node in nodes_of(graph, &program, "Lapp.js/f") {
        let this = program.function_by_name("Lapp.js/f").unwrap().this_param;
        let receivers = result.pointer_analysis.points_to_local(node, this);
        assert_eq!(receivers.len(), 1);
    }

    let merged = analyze(&program, options(CallGraphAlgorithm::ZeroCfa));
    let node = single_node(&merged.call_graph, &program, "Lapp.js/f");
    let this = program.function_by_name("Lapp.js/f").unwrap().this_param;
    assert_eq!(merged.pointer_analysis.points_to_local(node, this).len(), 2);
}

#[test]
fn test_zero_one_cfa_distinguishes_constructor_sites() {
    let program = fixture_constructor();

    let result = analyze(&program, options(CallGraphAlgorithm::ZeroOneCfa));
    assert_eq!(nodes_of(&result.call_graph, &program, "Lctor.js/C").len(), 2);
    // The method call is ordinary, hence context-insensitive
    single_node(&result.call_graph, &program, "Lctor.js/run");

    let insensitive = analyze(&program, options(CallGraphAlgorithm::ZeroCfa));
    single_node(&insensitive.call_graph, &program, "Lctor.js/C");
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_call_resolves_like_direct_call() {
    let direct = fixture_dispatch(DispatchStyle::Direct);
    let reflective = fixture_dispatch(DispatchStyle::Call);

    for algorithm in CallGraphAlgorithm::ALL {
        let direct_result = analyze(&direct, options(algorithm));
        let reflective_result = analyze(&reflective, options(algorithm));

        let direct_main = single_node(&direct_result.call_graph, &direct, "Ldispatch.js");
        let reflective_main =
            single_node(&reflective_result.call_graph, &reflective, "Ldispatch.js");

        // direct: call at pc 5; reflective: property read at pc 5, call at pc 6
        let expected = BTreeSet::from([
            "Ldispatch.js/g".to_string(),
            "Ldispatch.js/h".to_string(),
        ]);
        assert_eq!(
            target_names(&direct_result.call_graph, &direct, direct_main, 5),
            expected
        );
        assert_eq!(
            target_names(&reflective_result.call_graph, &reflective, reflective_main, 6),
            expected,
            "{}",
            algorithm
        );
    }
}

#[test]
fn test_call_binds_receiver_and_shifts_arguments() {
    let program = fixture_dispatch(DispatchStyle::Call);
    let result = analyze(&program, options(CallGraphAlgorithm::ZeroCfa));
    let graph = &result.call_graph;
    let g = program.function_by_name("Ldispatch.js/g").unwrap();
    let node = single_node(graph, &program, "Ldispatch.js/g");

    let this = result.pointer_analysis.points_to_local(node, g.this_param);
    let param = result.pointer_analysis.points_to_local(node, g.params[0]);
    let pc_of = |key: &InstanceKey| match key {
        InstanceKey::Allocation { site, .. } => Some(site.pc),
        _ => None,
    };
    // r allocated at pc 3, x at pc 4
    assert_eq!(this.into_iter().map(pc_of).collect::<Vec<_>>(), vec![Some(3)]);
    assert_eq!(param.into_iter().map(pc_of).collect::<Vec<_>>(), vec![Some(4)]);
}

#[test]
fn test_apply_spreads_array_elements_into_parameters() {
    let program = fixture_dispatch(DispatchStyle::Apply);
    let result = analyze(&program, options(CallGraphAlgorithm::ZeroOneCfa));
    let graph = &result.call_graph;

    for name in ["Ldispatch.js/g", "Ldispatch.js/h"] {
        let function = program.function_by_name(name).unwrap();
        let node = single_node(graph, &program, name);
        let param = result.pointer_analysis.points_to_local(node, function.params[0]);
        assert_eq!(param.len(), 1, "{}", name);

        // Dispatched through apply, so 0-1-CFA gives it a call-string context
        assert!(!graph.node(node).unwrap().context.is_everywhere());
    }
}

#[test]
fn test_call_without_rewriting_reaches_builtin_only() {
    let program = fixture_dispatch(DispatchStyle::Call);
    let result = analyze(
        &program,
        options(CallGraphAlgorithm::ZeroOneCfa).handle_call_apply(false),
    );
    assert!(nodes_of(&result.call_graph, &program, "Ldispatch.js/g").is_empty());
    assert!(nodes_of(&result.call_graph, &program, "Ldispatch.js/h").is_empty());
}

#[test]
fn test_prototype_method_dispatch() {
    let program = fixture_constructor();
    let result = analyze(&program, AnalysisOptions::default());
    let graph = &result.call_graph;
    let main = single_node(graph, &program, "Lctor.js");

    // pc 6 reads `run`, pc 7 calls it
    assert_eq!(
        target_names(graph, &program, main, 7),
        BTreeSet::from(["Lctor.js/run".to_string()])
    );
}

#[test]
fn test_constructed_objects_inherit_from_prototype() {
    let program = fixture_constructor();
    let result = analyze(&program, AnalysisOptions::default());
    let main = single_node(&result.call_graph, &program, "Lctor.js");
    let main_fn = program.function_by_name("Lctor.js").unwrap();

    // `a` is the destination of the first construct (pc 4)
    let a = main_fn.call_at(4).unwrap().dst.unwrap();
    let objects = result.pointer_analysis.points_to_local(main, a);
    assert_eq!(objects.len(), 1);
    let object = result.pointer_analysis.instance_key_id(objects[0]).unwrap();

    let proto = result
        .pointer_analysis
        .points_to(&PointerKey::field(object, Property::Proto));
    assert!(proto.iter().any(|k| matches!(
        k,
        InstanceKey::Allocation { site, .. } if matches!(site.kind, ObjectKind::Prototype(_))
    )));
}

#[test]
fn test_lexical_scope_flow() {
    let program = fixture_lexical_scope();
    let result = analyze(&program, AnalysisOptions::default());
    let graph = &result.call_graph;

    let inner = single_node(graph, &program, "Lscope.js/outer/inner");
    assert_eq!(
        target_names(graph, &program, inner, 1),
        BTreeSet::from(["Lscope.js/outer/helper".to_string()])
    );
    assert!(graph.unknown_target().is_none());
}

#[test]
fn test_unknown_target_for_unresolved_calls() {
    let program = fixture_computed_keys();
    // Without reflection the string-keyed call cannot be resolved
    let result = analyze(&program, AnalysisOptions::default());
    let graph = &result.call_graph;
    let main = single_node(graph, &program, "Lkeys.js");

    let unknown = graph.unknown_target().expect("unknown target node");
    assert_eq!(graph.targets(main, 5), Some(&BTreeSet::from([unknown])));
    // Numeric keys always resolve to the element summary
    assert_eq!(
        target_names(graph, &program, main, 11),
        BTreeSet::from(["Lkeys.js/indexed".to_string()])
    );
}

// ============================================================================
// Reflection and instance keys
// ============================================================================

#[test]
fn test_string_keys_resolve_with_string_only_reflection() {
    let program = fixture_computed_keys();
    let result = analyze(
        &program,
        AnalysisOptions::default()
            .reflection(ReflectionMode::StringOnly)
            .use_constant_specific_keys(true),
    );
    let graph = &result.call_graph;
    let main = single_node(graph, &program, "Lkeys.js");

    assert_eq!(
        target_names(graph, &program, main, 5),
        BTreeSet::from(["Lkeys.js/handler".to_string()])
    );
    assert!(graph.unknown_target().is_none());
}

#[test]
fn test_numeric_string_key_resolves_without_reflection() {
    // var o = {}; o["0"] = function f() {}; o["0"]();
    let mut builder = ProgramBuilder::new("index.js");
    let main = builder.script();
    let f = builder.declare("f");
    builder.define(f, |_| {});
    builder.define(main, |b| {
        let o = b.new_object();
        let key = b.string("0");
        let closure = b.closure(f);
        b.put_dynamic(o, key, closure);
        let read = b.get_dynamic(o, key);
        b.call_method(read, o, &[]);
    });
    let program = builder.build().unwrap();

    let result = analyze(
        &program,
        AnalysisOptions::default()
            .reflection(ReflectionMode::None)
            .use_constant_specific_keys(true),
    );
    let graph = &result.call_graph;
    let main = single_node(graph, &program, "Lindex.js");

    assert_eq!(
        target_names(graph, &program, main, 5),
        BTreeSet::from(["Lindex.js/f".to_string()])
    );
    assert!(graph.unknown_target().is_none());
}

#[test]
fn test_full_reflection_over_approximates() {
    let program = fixture_computed_keys();
    let result = analyze(
        &program,
        AnalysisOptions::default().reflection(ReflectionMode::Full),
    );
    let graph = &result.call_graph;
    let main = single_node(graph, &program, "Lkeys.js");

    let names = target_names(graph, &program, main, 5);
    assert!(names.contains("Lkeys.js/handler"));
    let names = target_names(graph, &program, main, 11);
    assert!(names.contains("Lkeys.js/indexed"));
}

#[test]
fn test_context_allocations_split_objects() {
    let program = fixture_constructor();
    let c = program.function_by_name("Lctor.js/C").unwrap().id;

    let count_objects = |mode: InstanceKeyMode| {
        let result = analyze(
            &program,
            options(CallGraphAlgorithm::OneCfa).instance_keys(mode),
        );
        let mut objects = BTreeSet::new();
        for node in result.call_graph.nodes_for_function(c) {
            let this = program.function(c).unwrap().this_param;
            for key in result.pointer_analysis.points_to_local(node, this) {
                objects.insert(key.clone());
            }
        }
        objects.len()
    };

    // Both constructions happen in main, whose context is Everywhere either way
    assert_eq!(count_objects(InstanceKeyMode::AllocationSites), 2);
    assert_eq!(count_objects(InstanceKeyMode::ContextAllocations), 2);
}
