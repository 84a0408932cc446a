//! Ports for context sensitivity
//!
//! Both strategies are injected into the call-graph builder as trait objects, so the engine
//! never branches on the configured algorithm.

use crate::features::call_graph::domain::{CallGraphNode, CallSiteReference};
use crate::features::context::domain::Context;
use crate::features::points_to::domain::{AllocationSite, DispatchKind, InstanceKey};
use crate::features::program::ConstantValue;
use crate::shared::{FunctionId, InstanceKeyId};
use std::fmt;

/// Everything a selector may look at when a call site reaches a callee
#[derive(Debug, Clone, Copy)]
pub struct ContextRequest<'a> {
    pub caller: &'a CallGraphNode,
    pub site: CallSiteReference,
    pub dispatch: DispatchKind,
    pub callee: FunctionId,
    /// Instance keys of the receiver (`this`) at the time of dispatch
    pub receivers: &'a [InstanceKeyId],
}

/// Chooses the context a callee is analyzed in
///
/// Implementations must be pure: the same request always yields the same context.
pub trait ContextSelector: fmt::Debug + Send + Sync {
    fn select(&self, request: &ContextRequest<'_>) -> Context;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Chooses the instance key an allocation or constant is abstracted to
pub trait InstanceKeyPolicy: fmt::Debug + Send + Sync {
    /// Key for an object allocated at `site` by a node analyzed in `context`
    fn allocation(&self, site: AllocationSite, context: Context) -> InstanceKey;

    /// Key for a literal; `None` for values that are not tracked (`null`)
    fn constant(&self, value: &ConstantValue) -> Option<InstanceKey>;

    fn name(&self) -> &'static str;
}
