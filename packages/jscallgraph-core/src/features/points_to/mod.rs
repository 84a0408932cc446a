//! # Pointer / Points-to Propagation Engine
//!
//! Inclusion-based points-to analysis over the abstractions the call-graph builder needs:
//! - **Instance keys**: allocation sites (optionally with heap context), constants, builtins
//! - **Pointer keys**: locals per call-graph node, return values, object properties, globals,
//!   closure-captured variables
//! - **Constraints**: property loads/stores (static and computed) and call-site invocations
//!
//! The engine never creates call-graph nodes itself. Invoke constraints whose callee set grew
//! are handed back to the builder, which resolves them and feeds the new bindings into the
//! same worklist.
//!
//! ## Usage
//! ```text
//! let mut system = PropagationSystem::new(ReflectionMode::None);
//! let a = system.local(node, 1);
//! let b = system.local(node, 2);
//! system.add_subset_edge(a, b);
//! system.add_points_to(a, object);
//! while let Some(WorkItem::Propagate(key)) = system.next_item() {
//!     system.propagate(key);
//! }
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::{
    AllocationSite, Builtin, CallConstraint, ConstantKey, ConstantKind, Constraint, DispatchKind,
    InstanceKey, ObjectKind, PointerAnalysis, PointerKey, PointsToSet, Property, WorkItem,
};
pub use infrastructure::{PropagationStats, PropagationSystem};
