//! Value interning
//!
//! Maps values to dense `u32` ids and back. Ids are handed out in insertion order, so two
//! runs that intern the same values in the same order agree on every id.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Bidirectional value ↔ id table
#[derive(Debug, Clone)]
pub struct Interner<T> {
    ids: FxHashMap<T, u32>,
    values: Vec<T>,
}

impl<T> Default for Interner<T> {
    fn default() -> Self {
        Self {
            ids: FxHashMap::default(),
            values: Vec::new(),
        }
    }
}

impl<T: Hash + Eq + Clone> Interner<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a value, returning its id and whether it was newly added
    #[inline]
    pub fn intern_new(&mut self, value: T) -> (u32, bool) {
        if let Some(&id) = self.ids.get(&value) {
            return (id, false);
        }
        let id = self.values.len() as u32;
        self.values.push(value.clone());
        self.ids.insert(value, id);
        (id, true)
    }

    /// Intern a value, returning its id
    #[inline]
    pub fn intern(&mut self, value: T) -> u32 {
        self.intern_new(value).0
    }

    /// Look up an already interned value
    #[inline]
    pub fn get(&self, value: &T) -> Option<u32> {
        self.ids.get(value).copied()
    }

    /// Resolve an id back to its value
    #[inline]
    pub fn resolve(&self, id: u32) -> Option<&T> {
        self.values.get(id as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(id, value)` in id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.values.iter().enumerate().map(|(i, v)| (i as u32, v))
    }
}

impl Interner<String> {
    /// Intern a borrowed string without allocating when it is already known
    pub fn intern_str(&mut self, value: &str) -> u32 {
        if let Some(&id) = self.ids.get(value) {
            return id;
        }
        self.intern(value.to_string())
    }

    pub fn get_str(&self, value: &str) -> Option<u32> {
        self.ids.get(value).copied()
    }
}
