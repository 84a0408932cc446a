//! Call-graph builder
//!
//! Drives the propagation engine and grows the call graph from the facts it produces:
//! 1. The fake root calls every entry point in the `Everywhere` context
//! 2. Visiting a node turns its body into subset edges and constraints
//! 3. An invoke constraint whose callee set grew is resolved into targets; each new
//!    (site, callee node) pair is bound: receiver, arguments, return value
//! 4. Repeat until the shared worklist is empty, the node ceiling refuses a node, or the
//!    monitor cancels
//!
//! Every rule only adds facts, so a run cut short holds a subset of the complete result.

use super::result::{AnalysisResult, BuildStats, Completion, TerminationReason};
use crate::config::AnalysisOptions;
use crate::errors::Result;
use crate::features::call_graph::domain::{
    CallBinding, CallGraph, CallGraphNode, CallSiteReference, Method, FAKE_ROOT,
};
use crate::features::call_graph::infrastructure::{DispatchResolver, DispatchTarget};
use crate::features::call_graph::ports::ProgressMonitor;
use crate::features::context::{
    instance_key_policy, selector_for, Context, ContextRequest, ContextSelector,
    InstanceKeyPolicy,
};
use crate::features::points_to::domain::{
    AllocationSite, Builtin, CallConstraint, Constraint, DispatchKind, InstanceKey, ObjectKind,
    PointerKey, PointsToSet, Property, WorkItem,
};
use crate::features::points_to::PropagationSystem;
use crate::features::program::{CallInstruction, CallKind, Function, Instruction, Program};
use crate::shared::{FunctionId, InstanceKeyId, NodeId, PointerKeyId, ProgramCounter, VarId};
use rustc_hash::FxHashSet;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Builds the call graph of one program under one set of options
pub struct CallGraphBuilder<'p> {
    program: &'p Program,
    options: AnalysisOptions,
    selector: Box<dyn ContextSelector>,
    keys: Box<dyn InstanceKeyPolicy>,
    resolver: DispatchResolver,

    system: PropagationSystem,
    graph: CallGraph,
    bindings: FxHashSet<CallBinding>,

    budget_exhausted: bool,
    iterations: usize,
    visited_nodes: usize,
}

impl<'p> CallGraphBuilder<'p> {
    /// Builder with the selector and instance-key policy `options` ask for
    pub fn new(program: &'p Program, options: AnalysisOptions) -> Result<Self> {
        let selector = selector_for(options.algorithm);
        let keys = instance_key_policy(&options);
        Self::with_strategies(program, options, selector, keys)
    }

    /// Builder with caller-supplied strategies
    ///
    /// Fails on invalid options or a malformed program; nothing has been analyzed then.
    pub fn with_strategies(
        program: &'p Program,
        options: AnalysisOptions,
        selector: Box<dyn ContextSelector>,
        keys: Box<dyn InstanceKeyPolicy>,
    ) -> Result<Self> {
        options.validate()?;
        program.validate()?;

        Ok(Self {
            program,
            system: PropagationSystem::new(options.reflection),
            resolver: DispatchResolver::new(options.handle_call_apply),
            options,
            selector,
            keys,
            graph: CallGraph::new(),
            bindings: FxHashSet::default(),
            budget_exhausted: false,
            iterations: 0,
            visited_nodes: 0,
        })
    }

    /// Run to the fixpoint or until stopped, and freeze the result
    pub fn build(mut self, monitor: &dyn ProgressMonitor) -> AnalysisResult {
        let started = Instant::now();
        info!(
            "Building call graph: {} functions, selector={}, keys={}, max_nodes={:?}",
            self.program.len(),
            self.selector.name(),
            self.keys.name(),
            self.options.max_nodes
        );
        monitor.begin_task("call graph construction", self.program.instruction_count());

        self.seed_builtins();
        self.add_entry_points();
        let completion = self.solve(monitor);
        self.graph.seal(completion.is_complete());
        monitor.done();

        let propagation = self.system.stats();
        let stats = BuildStats {
            iterations: self.iterations,
            visited_nodes: self.visited_nodes,
            pointer_keys: self.system.pointer_key_count(),
            instance_keys: self.system.instance_key_count(),
            points_to_facts: propagation.facts,
            subset_edges: propagation.subset_edges,
            constraints: propagation.constraints,
            elapsed: started.elapsed(),
        };
        info!(
            "Call graph built in {:?}: {} nodes, {} edges, {} iterations{}",
            stats.elapsed,
            self.graph.node_count(),
            self.graph.edge_count(),
            stats.iterations,
            if completion.is_complete() { "" } else { " (partial)" }
        );

        AnalysisResult {
            call_graph: self.graph,
            pointer_analysis: self.system.into_analysis(),
            completion,
            stats,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Main loop
    // ═══════════════════════════════════════════════════════════════════════════

    fn solve(&mut self, monitor: &dyn ProgressMonitor) -> Completion {
        loop {
            if self.budget_exhausted {
                let limit = self.options.max_nodes.unwrap_or_default();
                warn!(
                    "Node ceiling of {} reached with {} items pending, returning partial call graph",
                    limit,
                    self.system.pending()
                );
                return Completion::Partial(TerminationReason::NodeBudget { limit });
            }

            let Some(item) = self.system.next_item() else {
                return Completion::Complete;
            };

            if let Some(reason) = monitor.cancel_reason() {
                warn!(
                    "Call graph construction stopped ({}), returning partial call graph",
                    reason
                );
                return Completion::Partial(TerminationReason::Canceled(reason));
            }

            self.iterations += 1;
            match item {
                WorkItem::Propagate(key) => {
                    for (call, callees) in self.system.propagate(key) {
                        self.dispatch(call, &callees);
                    }
                }
                WorkItem::VisitNode(node) => self.visit_node(node, monitor),
                WorkItem::NewTarget(binding) => self.bind(binding),
            }
        }
    }

    /// Get or create a node, refusing creation at the ceiling
    fn node_for(&mut self, method: Method, context: Context) -> Option<NodeId> {
        if let Some(id) = self.graph.find_node(method, context) {
            return Some(id);
        }
        if let Some(limit) = self.options.max_nodes {
            if self.graph.node_count() >= limit {
                self.budget_exhausted = true;
                return None;
            }
        }
        let (id, _) = self.graph.add_node(method, context);
        trace!("New node {}: {:?} in {:?}", id, method, context);
        if method.function().is_some() {
            self.system.push(WorkItem::VisitNode(id));
        }
        Some(id)
    }

    fn call_instruction(&self, node: NodeId, pc: ProgramCounter) -> Option<&'p CallInstruction> {
        let program: &'p Program = self.program;
        let function = self.graph.node(node)?.method.function()?;
        program.function(function)?.call_at(pc)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Seeding
    // ═══════════════════════════════════════════════════════════════════════════

    fn builtin(&mut self, builtin: Builtin) -> InstanceKeyId {
        self.system.instance_key(InstanceKey::Builtin(builtin))
    }

    /// `Function.prototype.{call, apply}` and the prototype links of the builtins
    fn seed_builtins(&mut self) {
        let object_proto = self.builtin(Builtin::ObjectPrototype);
        let function_proto = self.builtin(Builtin::FunctionPrototype);

        let link = self.system.field(function_proto, Property::Proto);
        self.system.add_points_to(link, object_proto);

        for (name, builtin) in [("call", Builtin::Call), ("apply", Builtin::Apply)] {
            let key = self.builtin(builtin);
            let property = self.property(name);
            let slot = self.system.field(function_proto, property);
            self.system.add_points_to(slot, key);
            let link = self.system.field(key, Property::Proto);
            self.system.add_points_to(link, function_proto);
        }
    }

    fn add_entry_points(&mut self) {
        let program: &'p Program = self.program;
        for (index, &entry) in program.entry_points.iter().enumerate() {
            let site = CallSiteReference::new(index as ProgramCounter, CallKind::Call);
            self.graph.add_site(FAKE_ROOT, site);
            if let Some(node) = self.node_for(Method::Function(entry), Context::Everywhere) {
                self.graph.add_edge(FAKE_ROOT, site, node);
                debug!("Entry point {} is node {}", entry, node);
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Constraint generation
    // ═══════════════════════════════════════════════════════════════════════════

    fn property(&mut self, name: &str) -> Property {
        if name == "__proto__" {
            Property::Proto
        } else if name.parse::<u32>().is_ok() {
            Property::Element
        } else {
            Property::Named(self.system.intern_name(name))
        }
    }

    fn allocate(&mut self, site: AllocationSite, context: Context) -> InstanceKeyId {
        let key = self.keys.allocation(site, context);
        self.system.instance_key(key)
    }

    fn copy(&mut self, node: NodeId, src: VarId, dst: VarId) {
        let src = self.system.local(node, src);
        let dst = self.system.local(node, dst);
        self.system.add_subset_edge(src, dst);
    }

    fn visit_node(&mut self, node: NodeId, monitor: &dyn ProgressMonitor) {
        let program: &'p Program = self.program;
        let Some(CallGraphNode {
            method, context, ..
        }) = self.graph.node(node).copied()
        else {
            return;
        };
        let Some(function) = method.function().and_then(|f| program.function(f)) else {
            return;
        };

        self.visited_nodes += 1;
        for (pc, instruction) in function.instructions.iter().enumerate() {
            self.add_constraints(node, context, function, pc as ProgramCounter, instruction);
        }
        monitor.worked(function.instructions.len());
    }

    fn add_constraints(
        &mut self,
        node: NodeId,
        context: Context,
        function: &Function,
        pc: ProgramCounter,
        instruction: &Instruction,
    ) {
        match instruction {
            Instruction::NewObject { dst } | Instruction::NewArray { dst } => {
                let kind = if matches!(instruction, Instruction::NewArray { .. }) {
                    ObjectKind::Array
                } else {
                    ObjectKind::Object
                };
                let object = self.allocate(AllocationSite::new(function.id, pc, kind), context);
                let dst = self.system.local(node, *dst);
                self.system.add_points_to(dst, object);

                let object_proto = self.builtin(Builtin::ObjectPrototype);
                let link = self.system.field(object, Property::Proto);
                self.system.add_points_to(link, object_proto);
            }
            Instruction::Closure { dst, function: f } => {
                self.add_closure(node, context, function.id, pc, *dst, *f);
            }
            Instruction::Constant { dst, value } => {
                if let Some(key) = self.keys.constant(value) {
                    let key = self.system.instance_key(key);
                    let dst = self.system.local(node, *dst);
                    self.system.add_points_to(dst, key);
                }
            }
            Instruction::Copy { dst, src } => self.copy(node, *src, *dst),
            Instruction::Phi { dst, sources } => {
                for &src in sources {
                    self.copy(node, src, *dst);
                }
            }
            Instruction::GetProperty {
                dst,
                object,
                property,
            } => {
                let property = self.property(property);
                let base = self.system.local(node, *object);
                let dst = self.system.local(node, *dst);
                self.system
                    .add_constraint(base, Constraint::Load { property, dst });
            }
            Instruction::PutProperty {
                object,
                property,
                value,
            } => {
                let property = self.property(property);
                let base = self.system.local(node, *object);
                let src = self.system.local(node, *value);
                self.system
                    .add_constraint(base, Constraint::Store { property, src });
            }
            Instruction::GetDynamic { dst, object, key } => {
                let object = self.system.local(node, *object);
                let key = self.system.local(node, *key);
                let dst = self.system.local(node, *dst);
                let load = Constraint::DynamicLoad { object, key, dst };
                self.system.add_constraint(object, load);
                self.system.add_constraint(key, load);
            }
            Instruction::PutDynamic { object, key, value } => {
                let object = self.system.local(node, *object);
                let key = self.system.local(node, *key);
                let src = self.system.local(node, *value);
                let store = Constraint::DynamicStore { object, key, src };
                self.system.add_constraint(object, store);
                self.system.add_constraint(key, store);
            }
            Instruction::GlobalRead { dst, name } => {
                let global = self.system.global(name);
                let dst = self.system.local(node, *dst);
                self.system.add_subset_edge(global, dst);
            }
            Instruction::GlobalWrite { name, value } => {
                let global = self.system.global(name);
                let src = self.system.local(node, *value);
                self.system.add_subset_edge(src, global);
            }
            Instruction::LexicalRead { dst, name, definer } => {
                let variable = self.system.lexical(*definer, name);
                let dst = self.system.local(node, *dst);
                self.system.add_subset_edge(variable, dst);
            }
            Instruction::LexicalWrite {
                name,
                definer,
                value,
            } => {
                let variable = self.system.lexical(*definer, name);
                let src = self.system.local(node, *value);
                self.system.add_subset_edge(src, variable);
            }
            Instruction::Invoke(call) => {
                self.graph
                    .add_site(node, CallSiteReference::new(pc, call.kind));
                let callee = self.system.local(node, call.callee);
                self.system.add_constraint(
                    callee,
                    Constraint::Invoke(CallConstraint {
                        caller: node,
                        pc,
                        dispatch: DispatchKind::Direct,
                    }),
                );
            }
            Instruction::Return { value } => {
                if let Some(value) = value {
                    let src = self.system.local(node, *value);
                    let ret = self.system.return_value(node);
                    self.system.add_subset_edge(src, ret);
                }
            }
        }
    }

    /// Function object, its fresh `prototype` object, and their prototype links
    fn add_closure(
        &mut self,
        node: NodeId,
        context: Context,
        enclosing: FunctionId,
        pc: ProgramCounter,
        dst: VarId,
        target: FunctionId,
    ) {
        let closure = self.allocate(
            AllocationSite::new(enclosing, pc, ObjectKind::Function(target)),
            context,
        );
        let prototype = self.allocate(
            AllocationSite::new(enclosing, pc, ObjectKind::Prototype(target)),
            context,
        );
        let dst = self.system.local(node, dst);
        self.system.add_points_to(dst, closure);

        let prototype_name = self.property("prototype");
        let slot = self.system.field(closure, prototype_name);
        self.system.add_points_to(slot, prototype);

        let constructor = self.property("constructor");
        let slot = self.system.field(prototype, constructor);
        self.system.add_points_to(slot, closure);

        let function_proto = self.builtin(Builtin::FunctionPrototype);
        let link = self.system.field(closure, Property::Proto);
        self.system.add_points_to(link, function_proto);

        let object_proto = self.builtin(Builtin::ObjectPrototype);
        let link = self.system.field(prototype, Property::Proto);
        self.system.add_points_to(link, object_proto);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Dispatch and binding
    // ═══════════════════════════════════════════════════════════════════════════

    fn dispatch(&mut self, call: CallConstraint, callees: &PointsToSet) {
        let Some(site) = self.call_instruction(call.caller, call.pc) else {
            return;
        };
        let reference = CallSiteReference::new(call.pc, site.kind);

        for target in self.resolver.resolve(&self.system, callees, call.dispatch) {
            match target {
                DispatchTarget::Function { function, key } => {
                    self.dispatch_to_function(call, site, reference, function, key);
                }
                DispatchTarget::Builtin(builtin) => {
                    if let Some(callee) = self.node_for(Method::Builtin(builtin), Context::Everywhere)
                    {
                        self.graph.add_edge(call.caller, reference, callee);
                    }
                }
                DispatchTarget::Reflective(dispatch) => {
                    // f.call(..) / f.apply(..): dispatch again on what `f` holds
                    if let Some(receiver) = site.receiver {
                        let receiver = self.system.local(call.caller, receiver);
                        self.system.add_constraint(
                            receiver,
                            Constraint::Invoke(CallConstraint { dispatch, ..call }),
                        );
                    }
                }
            }
        }
    }

    fn dispatch_to_function(
        &mut self,
        call: CallConstraint,
        site: &CallInstruction,
        reference: CallSiteReference,
        function: FunctionId,
        key: InstanceKeyId,
    ) {
        let receiver = match call.dispatch {
            DispatchKind::Direct => site.receiver,
            DispatchKind::Call | DispatchKind::Apply => site.args.first().copied(),
        };
        let receivers: Vec<InstanceKeyId> = receiver
            .and_then(|var| {
                self.system
                    .find_pointer_key(&PointerKey::local(call.caller, var))
            })
            .map(|pk| self.system.points_to(pk).as_slice().to_vec())
            .unwrap_or_default();
        let Some(caller) = self.graph.node(call.caller).copied() else {
            return;
        };

        let context = self.selector.select(&ContextRequest {
            caller: &caller,
            site: reference,
            dispatch: call.dispatch,
            callee: function,
            receivers: &receivers,
        });
        let Some(callee) = self.node_for(Method::Function(function), context) else {
            return;
        };
        self.graph.add_edge(call.caller, reference, callee);

        let binding = CallBinding {
            caller: call.caller,
            pc: call.pc,
            callee,
            function: key,
            dispatch: call.dispatch,
        };
        if self.bindings.insert(binding) {
            self.system.push(WorkItem::NewTarget(binding));
        }
    }

    /// Connect receiver, arguments and return value of a new (site, callee) pair
    fn bind(&mut self, binding: CallBinding) {
        let program: &'p Program = self.program;
        let Some(site) = self.call_instruction(binding.caller, binding.pc) else {
            return;
        };
        let Some(caller) = self.graph.node(binding.caller).copied() else {
            return;
        };
        let Some(callee_fn) = self
            .graph
            .node(binding.callee)
            .and_then(|n| n.method.function())
            .and_then(|f| program.function(f))
        else {
            return;
        };
        let callee = binding.callee;
        let this = self.system.local(callee, callee_fn.this_param);

        // Receiver
        match binding.dispatch {
            DispatchKind::Direct if site.kind == CallKind::Construct => {
                self.bind_construct(&binding, &caller, site, this);
            }
            DispatchKind::Direct => {
                if let Some(receiver) = site.receiver {
                    let receiver = self.system.local(caller.id, receiver);
                    self.system.add_subset_edge(receiver, this);
                }
            }
            DispatchKind::Call | DispatchKind::Apply => {
                if let Some(&receiver) = site.args.first() {
                    let receiver = self.system.local(caller.id, receiver);
                    self.system.add_subset_edge(receiver, this);
                }
            }
        }

        // Arguments
        match binding.dispatch {
            DispatchKind::Direct | DispatchKind::Call => {
                let skip = usize::from(binding.dispatch == DispatchKind::Call);
                for (&arg, &param) in site.args.iter().skip(skip).zip(&callee_fn.params) {
                    let arg = self.system.local(caller.id, arg);
                    let param = self.system.local(callee, param);
                    self.system.add_subset_edge(arg, param);
                }
            }
            DispatchKind::Apply => {
                if let Some(&array) = site.args.get(1) {
                    let array = self.system.local(caller.id, array);
                    for &param in &callee_fn.params {
                        let dst = self.system.local(callee, param);
                        self.system.add_constraint(
                            array,
                            Constraint::Load {
                                property: Property::Element,
                                dst,
                            },
                        );
                    }
                }
            }
        }

        // Return value
        if let Some(dst) = site.dst {
            let ret = self.system.return_value(callee);
            let dst = self.system.local(caller.id, dst);
            self.system.add_subset_edge(ret, dst);
        }
    }

    /// `new F(..)`: fresh object as `this` and result, inheriting from `F.prototype`
    fn bind_construct(
        &mut self,
        binding: &CallBinding,
        caller: &CallGraphNode,
        site: &CallInstruction,
        this: PointerKeyId,
    ) {
        let Some(caller_fn) = caller.method.function() else {
            return;
        };
        let object = self.allocate(
            AllocationSite::new(caller_fn, binding.pc, ObjectKind::Object),
            caller.context,
        );
        self.system.add_points_to(this, object);

        let prototype_name = self.property("prototype");
        let prototype = self.system.field(binding.function, prototype_name);
        let link = self.system.field(object, Property::Proto);
        self.system.add_subset_edge(prototype, link);

        if let Some(dst) = site.dst {
            let dst = self.system.local(caller.id, dst);
            self.system.add_points_to(dst, object);
        }
    }
}
