//! Complex constraints
//!
//! Subset edges (`x ⊇ y`) are stored directly in the propagation graph. Everything that
//! depends on the *contents* of a points-to set is a constraint attached to the pointer key
//! whose set it reads, and is re-evaluated whenever that set grows:
//! - LOAD:   `dst = base.p`     → ∀o ∈ pts(base): pts(dst) ⊇ pts(o.p), then o.__proto__.p
//! - STORE:  `base.p = src`     → ∀o ∈ pts(base): pts(o.p) ⊇ pts(src)
//! - DYNAMIC LOAD/STORE: same, with `p` ranging over the property names pts(key) denotes
//! - INVOKE: ∀f ∈ pts(callee): dispatch the call site to f

use super::pointer_key::Property;
use crate::shared::{NodeId, PointerKeyId, ProgramCounter};
use serde::{Deserialize, Serialize};

/// How a call site's targets are found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DispatchKind {
    /// The site's callee value is the function invoked
    Direct,
    /// `f.call(r, a...)`: the site's receiver `f` is invoked with `r` as `this`
    Call,
    /// `f.apply(r, arr)`: the site's receiver `f` is invoked with `r` as `this`
    Apply,
}

impl DispatchKind {
    #[inline]
    pub fn is_reflective(&self) -> bool {
        !matches!(self, DispatchKind::Direct)
    }
}

/// A call site awaiting targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallConstraint {
    /// Call-graph node containing the site
    pub caller: NodeId,
    pub pc: ProgramCounter,
    pub dispatch: DispatchKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    /// Attached to the base: `dst = base.property`
    Load {
        property: Property,
        dst: PointerKeyId,
    },

    /// Attached to the base: `base.property = src`
    Store {
        property: Property,
        src: PointerKeyId,
    },

    /// Attached to both object and key: `dst = object[key]`
    DynamicLoad {
        object: PointerKeyId,
        key: PointerKeyId,
        dst: PointerKeyId,
    },

    /// Attached to both object and key: `object[key] = src`
    DynamicStore {
        object: PointerKeyId,
        key: PointerKeyId,
        src: PointerKeyId,
    },

    /// Attached to the value whose targets are invoked
    Invoke(CallConstraint),
}

impl Constraint {
    pub fn kind_str(&self) -> &'static str {
        match self {
            Constraint::Load { .. } => "LOAD",
            Constraint::Store { .. } => "STORE",
            Constraint::DynamicLoad { .. } => "DYNAMIC_LOAD",
            Constraint::DynamicStore { .. } => "DYNAMIC_STORE",
            Constraint::Invoke(_) => "INVOKE",
        }
    }
}
