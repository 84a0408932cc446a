//! Frozen points-to result

use super::instance_key::InstanceKey;
use super::points_to_set::PointsToSet;
use super::pointer_key::{PointerKey, Property};
use crate::shared::{InstanceKeyId, Interner, NameId, NodeId, VarId};

/// Read-only view of the converged (or interrupted) points-to relation
#[derive(Debug, Clone)]
pub struct PointerAnalysis {
    names: Interner<String>,
    instance_keys: Interner<InstanceKey>,
    pointer_keys: Interner<PointerKey>,
    points_to: Vec<PointsToSet>,
}

impl PointerAnalysis {
    pub(crate) fn new(
        names: Interner<String>,
        instance_keys: Interner<InstanceKey>,
        pointer_keys: Interner<PointerKey>,
        points_to: Vec<PointsToSet>,
    ) -> Self {
        Self {
            names,
            instance_keys,
            pointer_keys,
            points_to,
        }
    }

    /// Points-to set of a key; `None` if the analysis never created the key
    pub fn points_to_set(&self, key: &PointerKey) -> Option<&PointsToSet> {
        let id = self.pointer_keys.get(key)?;
        self.points_to.get(id as usize)
    }

    /// Instance keys a location may hold
    pub fn points_to(&self, key: &PointerKey) -> Vec<&InstanceKey> {
        self.points_to_set(key)
            .map(|set| {
                set.iter()
                    .filter_map(|id| self.instance_keys.resolve(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Instance keys SSA value `var` of `node` may hold
    pub fn points_to_local(&self, node: NodeId, var: VarId) -> Vec<&InstanceKey> {
        self.points_to(&PointerKey::local(node, var))
    }

    /// Instance keys stored in `object.name`
    pub fn points_to_property(&self, object: InstanceKeyId, name: &str) -> Vec<&InstanceKey> {
        match self.name_id(name) {
            Some(name) => self.points_to(&PointerKey::field(object, Property::Named(name))),
            None => Vec::new(),
        }
    }

    pub fn instance_key(&self, id: InstanceKeyId) -> Option<&InstanceKey> {
        self.instance_keys.resolve(id)
    }

    pub fn instance_key_id(&self, key: &InstanceKey) -> Option<InstanceKeyId> {
        self.instance_keys.get(key)
    }

    pub fn name(&self, id: NameId) -> Option<&str> {
        self.names.resolve(id).map(String::as_str)
    }

    pub fn name_id(&self, name: &str) -> Option<NameId> {
        self.names.get_str(name)
    }

    /// Every pointer key with its set, in creation order
    pub fn iter(&self) -> impl Iterator<Item = (&PointerKey, &PointsToSet)> {
        self.pointer_keys
            .iter()
            .filter_map(|(id, key)| self.points_to.get(id as usize).map(|set| (key, set)))
    }

    pub fn pointer_key_count(&self) -> usize {
        self.pointer_keys.len()
    }

    pub fn instance_key_count(&self) -> usize {
        self.instance_keys.len()
    }

    /// Total (pointer key, instance key) facts
    pub fn fact_count(&self) -> usize {
        self.points_to.iter().map(PointsToSet::len).sum()
    }
}
