//! Worklist propagation engine
//!
//! Inclusion-based (Andersen-style) propagation over pointer keys:
//! - subset edges `to ⊇ from` forward new facts eagerly
//! - complex constraints attached to a key are re-evaluated whenever its set grows
//! - invoke constraints are handed back to the caller, which owns call-graph construction
//!
//! Everything only ever grows, so evaluation order affects speed, never the fixpoint.

use crate::config::ReflectionMode;
use crate::features::points_to::domain::{
    CallConstraint, ConstantKey, ConstantKind, Constraint, InstanceKey, PointerAnalysis,
    PointerKey, PointsToSet, Property, WorkItem,
};
use crate::features::points_to::infrastructure::worklist::Worklist;
use crate::shared::{
    FunctionId, InstanceKeyId, Interner, NameId, NodeId, PointerKeyId, VarId,
};
use rustc_hash::FxHashSet;

/// Counters of a propagation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Pointer keys popped and propagated
    pub propagations: usize,
    pub subset_edges: usize,
    pub constraints: usize,
    /// Total (pointer key, instance key) facts
    pub facts: usize,
}

/// Mutable constraint system of one analysis run
#[derive(Debug)]
pub struct PropagationSystem {
    reflection: ReflectionMode,

    names: Interner<String>,
    instance_keys: Interner<InstanceKey>,
    pointer_keys: Interner<PointerKey>,

    /// Indexed by pointer key id
    points_to: Vec<PointsToSet>,
    successors: Vec<Vec<PointerKeyId>>,
    constraints: Vec<Vec<Constraint>>,

    edge_index: FxHashSet<(PointerKeyId, PointerKeyId)>,
    constraint_index: FxHashSet<(PointerKeyId, Constraint)>,

    worklist: Worklist,
    stats: PropagationStats,
}

impl PropagationSystem {
    pub fn new(reflection: ReflectionMode) -> Self {
        Self {
            reflection,
            names: Interner::new(),
            instance_keys: Interner::new(),
            pointer_keys: Interner::new(),
            points_to: Vec::new(),
            successors: Vec::new(),
            constraints: Vec::new(),
            edge_index: FxHashSet::default(),
            constraint_index: FxHashSet::default(),
            worklist: Worklist::new(),
            stats: PropagationStats::default(),
        }
    }

    #[inline]
    pub fn reflection(&self) -> ReflectionMode {
        self.reflection
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Keys
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn intern_name(&mut self, name: &str) -> NameId {
        self.names.intern_str(name)
    }

    pub fn name(&self, id: NameId) -> Option<&str> {
        self.names.resolve(id).map(String::as_str)
    }

    pub fn instance_key(&mut self, key: InstanceKey) -> InstanceKeyId {
        self.instance_keys.intern(key)
    }

    pub fn resolve_instance_key(&self, id: InstanceKeyId) -> Option<&InstanceKey> {
        self.instance_keys.resolve(id)
    }

    pub fn pointer_key(&mut self, key: PointerKey) -> PointerKeyId {
        let (id, new) = self.pointer_keys.intern_new(key);
        if new {
            self.points_to.push(PointsToSet::new());
            self.successors.push(Vec::new());
            self.constraints.push(Vec::new());
        }
        id
    }

    pub fn find_pointer_key(&self, key: &PointerKey) -> Option<PointerKeyId> {
        self.pointer_keys.get(key)
    }

    #[inline]
    pub fn local(&mut self, node: NodeId, var: VarId) -> PointerKeyId {
        self.pointer_key(PointerKey::local(node, var))
    }

    #[inline]
    pub fn return_value(&mut self, node: NodeId) -> PointerKeyId {
        self.pointer_key(PointerKey::Return { node })
    }

    #[inline]
    pub fn field(&mut self, object: InstanceKeyId, property: Property) -> PointerKeyId {
        self.pointer_key(PointerKey::field(object, property))
    }

    #[inline]
    pub fn global(&mut self, name: &str) -> PointerKeyId {
        let name = self.intern_name(name);
        self.pointer_key(PointerKey::Global { name })
    }

    #[inline]
    pub fn lexical(&mut self, definer: FunctionId, name: &str) -> PointerKeyId {
        let name = self.intern_name(name);
        self.pointer_key(PointerKey::Lexical { definer, name })
    }

    /// Current points-to set of a key
    #[inline]
    pub fn points_to(&self, key: PointerKeyId) -> &PointsToSet {
        &self.points_to[key as usize]
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Facts and constraints
    // ═══════════════════════════════════════════════════════════════════════════

    /// Add `instance ∈ pts(key)`, returning true if it is new
    pub fn add_points_to(&mut self, key: PointerKeyId, instance: InstanceKeyId) -> bool {
        if !self.points_to[key as usize].insert(instance) {
            return false;
        }
        self.stats.facts += 1;
        self.worklist.push(WorkItem::Propagate(key));
        true
    }

    /// Add `pts(to) ⊇ pts(from)`, returning true if the edge is new
    pub fn add_subset_edge(&mut self, from: PointerKeyId, to: PointerKeyId) -> bool {
        if from == to || !self.edge_index.insert((from, to)) {
            return false;
        }
        self.successors[from as usize].push(to);
        self.stats.subset_edges += 1;

        if !self.points_to[from as usize].is_empty() {
            let facts = self.points_to[from as usize].clone();
            self.union_into(to, &facts);
        }
        true
    }

    /// Attach a constraint to `key`, returning true if it is new
    ///
    /// A new constraint on a non-empty key schedules the key, so it sees existing facts.
    pub fn add_constraint(&mut self, key: PointerKeyId, constraint: Constraint) -> bool {
        if !self.constraint_index.insert((key, constraint)) {
            return false;
        }
        self.constraints[key as usize].push(constraint);
        self.stats.constraints += 1;

        if !self.points_to[key as usize].is_empty() {
            self.worklist.push(WorkItem::Propagate(key));
        }
        true
    }

    fn union_into(&mut self, to: PointerKeyId, facts: &PointsToSet) {
        let set = &mut self.points_to[to as usize];
        let before = set.len();
        if set.union_with(facts) {
            self.stats.facts += set.len() - before;
            self.worklist.push(WorkItem::Propagate(to));
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Worklist
    // ═══════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn push(&mut self, item: WorkItem) {
        self.worklist.push(item);
    }

    #[inline]
    pub fn next_item(&mut self) -> Option<WorkItem> {
        self.worklist.pop()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.worklist.len()
    }

    /// Propagate the facts of `key` and evaluate its constraints
    ///
    /// Returns the invoke constraints attached to `key` together with the callee set they
    /// must dispatch on.
    pub fn propagate(&mut self, key: PointerKeyId) -> Vec<(CallConstraint, PointsToSet)> {
        self.stats.propagations += 1;
        let facts = self.points_to[key as usize].clone();
        if facts.is_empty() {
            return Vec::new();
        }

        let successors = self.successors[key as usize].clone();
        for succ in successors {
            self.union_into(succ, &facts);
        }

        let mut invocations = Vec::new();
        let constraints = self.constraints[key as usize].clone();
        for constraint in constraints {
            match constraint {
                Constraint::Load { property, dst } => {
                    for object in facts.iter() {
                        self.load(object, property, dst);
                    }
                }
                Constraint::Store { property, src } => {
                    for object in facts.iter() {
                        self.store(object, property, src);
                    }
                }
                Constraint::DynamicLoad { object, key, dst } => {
                    let (objects, properties) = self.dynamic_operands(object, key);
                    for object in objects.iter() {
                        for &property in &properties {
                            self.load(object, property, dst);
                        }
                    }
                }
                Constraint::DynamicStore { object, key, src } => {
                    let (objects, properties) = self.dynamic_operands(object, key);
                    for object in objects.iter() {
                        for &property in &properties {
                            self.store(object, property, src);
                        }
                    }
                }
                Constraint::Invoke(call) => invocations.push((call, facts.clone())),
            }
        }
        invocations
    }

    fn is_object(&self, key: InstanceKeyId) -> bool {
        self.instance_keys
            .resolve(key)
            .is_some_and(|k| !k.is_primitive())
    }

    /// `dst ⊇ object.property`, continuing through `object.__proto__`
    fn load(&mut self, object: InstanceKeyId, property: Property, dst: PointerKeyId) {
        if !self.is_object(object) {
            return;
        }
        for field in property.read_set(self.reflection) {
            let field = self.field(object, field);
            self.add_subset_edge(field, dst);
        }
        if property.follows_prototype_chain() {
            let proto = self.field(object, Property::Proto);
            self.add_constraint(proto, Constraint::Load { property, dst });
        }
    }

    /// `object.property ⊇ src`
    fn store(&mut self, object: InstanceKeyId, property: Property, src: PointerKeyId) {
        if !self.is_object(object) {
            return;
        }
        for field in property.write_set(self.reflection) {
            let field = self.field(object, field);
            self.add_subset_edge(src, field);
        }
    }

    fn dynamic_operands(
        &mut self,
        object: PointerKeyId,
        key: PointerKeyId,
    ) -> (PointsToSet, Vec<Property>) {
        let objects = self.points_to[object as usize].clone();
        let keys = self.points_to[key as usize].clone();
        (objects, self.key_properties(&keys))
    }

    /// Properties a computed key may denote under the reflection mode
    fn key_properties(&mut self, keys: &PointsToSet) -> Vec<Property> {
        let mut properties = Vec::new();
        for key in keys.iter() {
            let property = match self.instance_keys.resolve(key) {
                Some(InstanceKey::Constant(ConstantKey::Number(_)))
                | Some(InstanceKey::ConstantKind(ConstantKind::Number)) => Some(Property::Element),
                // "0", "1", ... name array elements whatever the reflection mode
                Some(InstanceKey::Constant(ConstantKey::String(s))) if s.parse::<u32>().is_ok() => {
                    Some(Property::Element)
                }
                Some(InstanceKey::Constant(ConstantKey::String(s)))
                    if self.reflection.resolves_string_keys() =>
                {
                    Some(Property::Named(self.names.intern_str(s)))
                }
                _ if self.reflection.models_unknown_keys() => Some(Property::UnknownName),
                _ => None,
            };
            if let Some(property) = property {
                if !properties.contains(&property) {
                    properties.push(property);
                }
            }
        }
        properties
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Results
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn stats(&self) -> PropagationStats {
        self.stats
    }

    pub fn pointer_key_count(&self) -> usize {
        self.pointer_keys.len()
    }

    pub fn instance_key_count(&self) -> usize {
        self.instance_keys.len()
    }

    /// Freeze into a read-only query result
    pub fn into_analysis(self) -> PointerAnalysis {
        PointerAnalysis::new(
            self.names,
            self.instance_keys,
            self.pointer_keys,
            self.points_to,
        )
    }
}
