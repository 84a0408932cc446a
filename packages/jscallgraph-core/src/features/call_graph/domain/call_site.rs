//! Call sites and call bindings

use crate::features::points_to::domain::DispatchKind;
use crate::features::program::CallKind;
use crate::shared::{InstanceKeyId, NodeId, ProgramCounter};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A call instruction inside a node's body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallSiteReference {
    pub pc: ProgramCounter,
    pub kind: CallKind,
}

impl CallSiteReference {
    pub fn new(pc: ProgramCounter, kind: CallKind) -> Self {
        Self { pc, kind }
    }
}

impl fmt::Display for CallSiteReference {
    /// IR rendering, e.g. `JSCall@12` or `JSConstruct@3`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CallKind::Call => write!(f, "JSCall@{}", self.pc),
            CallKind::Construct => write!(f, "JSConstruct@{}", self.pc),
        }
    }
}

/// A resolved (call site, callee node) pair whose dataflow still has to be connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallBinding {
    pub caller: NodeId,
    pub pc: ProgramCounter,
    pub callee: NodeId,
    /// Function object the callee was dispatched on
    pub function: InstanceKeyId,
    pub dispatch: DispatchKind,
}
