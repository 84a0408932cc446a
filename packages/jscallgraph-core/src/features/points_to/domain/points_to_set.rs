//! Points-to sets
//!
//! Sorted vector of instance-key ids. Sets only grow during a run, and the typical set is
//! small, so a sorted `Vec` beats hashing for both union and iteration.

use crate::shared::InstanceKeyId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointsToSet {
    keys: Vec<InstanceKeyId>,
}

impl PointsToSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(key: InstanceKeyId) -> Self {
        Self { keys: vec![key] }
    }

    /// Insert a key, returning true if the set grew
    #[inline]
    pub fn insert(&mut self, key: InstanceKeyId) -> bool {
        match self.keys.binary_search(&key) {
            Ok(_) => false,
            Err(pos) => {
                self.keys.insert(pos, key);
                true
            }
        }
    }

    /// Union `other` into `self`, returning true if the set grew
    pub fn union_with(&mut self, other: &PointsToSet) -> bool {
        if other.keys.is_empty() {
            return false;
        }
        if self.keys.is_empty() {
            self.keys = other.keys.clone();
            return true;
        }
        if other.is_subset(self) {
            return false;
        }

        // Merge two sorted runs
        let mut merged = Vec::with_capacity(self.keys.len() + other.keys.len());
        let (mut i, mut j) = (0, 0);
        while i < self.keys.len() && j < other.keys.len() {
            let (a, b) = (self.keys[i], other.keys[j]);
            if a < b {
                merged.push(a);
                i += 1;
            } else if b < a {
                merged.push(b);
                j += 1;
            } else {
                merged.push(a);
                i += 1;
                j += 1;
            }
        }
        merged.extend_from_slice(&self.keys[i..]);
        merged.extend_from_slice(&other.keys[j..]);
        self.keys = merged;
        true
    }

    #[inline]
    pub fn contains(&self, key: InstanceKeyId) -> bool {
        self.keys.binary_search(&key).is_ok()
    }

    pub fn is_subset(&self, other: &PointsToSet) -> bool {
        if self.keys.len() > other.keys.len() {
            return false;
        }
        let mut j = 0;
        for &key in &self.keys {
            while j < other.keys.len() && other.keys[j] < key {
                j += 1;
            }
            if j == other.keys.len() || other.keys[j] != key {
                return false;
            }
            j += 1;
        }
        true
    }

    /// Keys in ascending id order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = InstanceKeyId> + '_ {
        self.keys.iter().copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[InstanceKeyId] {
        &self.keys
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<InstanceKeyId> for PointsToSet {
    fn from_iter<I: IntoIterator<Item = InstanceKeyId>>(iter: I) -> Self {
        let mut keys: Vec<_> = iter.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();
        Self { keys }
    }
}
