//! Domain models for points-to analysis

pub mod constraint;
pub mod instance_key;
pub mod pointer_analysis;
pub mod pointer_key;
pub mod points_to_set;
pub mod work_item;

pub use constraint::{CallConstraint, Constraint, DispatchKind};
pub use instance_key::{AllocationSite, Builtin, ConstantKey, ConstantKind, InstanceKey, ObjectKind};
pub use pointer_analysis::PointerAnalysis;
pub use pointer_key::{PointerKey, Property};
pub use points_to_set::PointsToSet;
pub use work_item::WorkItem;
