//! Pointer keys: abstract storage locations
//!
//! A pointer key is anything that can hold a set of instance keys: an SSA value inside a
//! call-graph node, a node's return value, a property of an abstract object, a global or a
//! closure-captured variable.

use crate::config::ReflectionMode;
use crate::shared::{FunctionId, InstanceKeyId, NameId, NodeId, VarId};
use serde::{Deserialize, Serialize};

/// Property of an abstract object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Property {
    /// Statically known property name
    Named(NameId),
    /// All numeric (array element) properties, merged
    Element,
    /// The `__proto__` link
    Proto,
    /// Values stored under keys the analysis could not resolve
    UnknownName,
    /// Summary of every value stored into the object under any key
    AllValues,
}

impl Property {
    /// Fields a read of `self` may observe
    pub fn read_set(self, reflection: ReflectionMode) -> Vec<Property> {
        match self {
            Property::Named(_) | Property::Element => {
                if reflection.models_unknown_keys() {
                    vec![self, Property::UnknownName]
                } else {
                    vec![self]
                }
            }
            // A read through an unknown key may see any stored value
            Property::UnknownName => vec![Property::AllValues, Property::UnknownName],
            Property::Proto | Property::AllValues => vec![self],
        }
    }

    /// Fields a write to `self` must update
    pub fn write_set(self, reflection: ReflectionMode) -> Vec<Property> {
        match self {
            Property::Named(_) | Property::Element => {
                if reflection.models_unknown_keys() {
                    vec![self, Property::AllValues]
                } else {
                    vec![self]
                }
            }
            Property::UnknownName => vec![Property::UnknownName, Property::AllValues],
            Property::Proto | Property::AllValues => vec![self],
        }
    }

    /// Whether reads of this property continue along the `__proto__` chain
    #[inline]
    pub fn follows_prototype_chain(self) -> bool {
        !matches!(self, Property::Proto)
    }
}

/// Abstract storage location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PointerKey {
    /// SSA value `var` inside call-graph node `node`
    Local { node: NodeId, var: VarId },
    /// Return value of `node`
    Return { node: NodeId },
    /// Property of an abstract object
    Field {
        object: InstanceKeyId,
        property: Property,
    },
    /// Global variable
    Global { name: NameId },
    /// Variable `name` declared by `definer`, shared by every closure that captures it
    Lexical { definer: FunctionId, name: NameId },
}

impl PointerKey {
    #[inline]
    pub fn local(node: NodeId, var: VarId) -> Self {
        PointerKey::Local { node, var }
    }

    #[inline]
    pub fn field(object: InstanceKeyId, property: Property) -> Self {
        PointerKey::Field { object, property }
    }

    /// Node this key belongs to, for node-local keys
    #[inline]
    pub fn node(&self) -> Option<NodeId> {
        match self {
            PointerKey::Local { node, .. } | PointerKey::Return { node } => Some(*node),
            _ => None,
        }
    }
}
