//! FIFO worklist with de-duplication of propagation items

use crate::features::points_to::domain::WorkItem;
use crate::shared::PointerKeyId;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Shared worklist
///
/// A pointer key is queued at most once at a time; propagating it picks up every fact added
/// while it waited. Node visits and call bindings are unique by construction.
#[derive(Debug, Default)]
pub struct Worklist {
    queue: VecDeque<WorkItem>,
    queued_keys: FxHashSet<PointerKeyId>,
    pushed: usize,
}

impl Worklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an item, returning false if an identical propagation item is already queued
    pub fn push(&mut self, item: WorkItem) -> bool {
        if let WorkItem::Propagate(key) = item {
            if !self.queued_keys.insert(key) {
                return false;
            }
        }
        self.queue.push_back(item);
        self.pushed += 1;
        true
    }

    pub fn pop(&mut self) -> Option<WorkItem> {
        let item = self.queue.pop_front()?;
        if let WorkItem::Propagate(key) = item {
            self.queued_keys.remove(&key);
        }
        Some(item)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Items accepted over the worklist's lifetime
    #[inline]
    pub fn total_pushed(&self) -> usize {
        self.pushed
    }
}
