//! Per-pass instance cache

use std::collections::HashMap;

use crate::types::Instance;

enum Slot {
    InProgress,
    Resolved(Instance),
}

/// Result of a cache lookup
#[derive(Debug)]
pub enum CacheLookup {
    Miss,
    /// The pointer is being resolved further up the current chain
    InProgress,
    Resolved(Instance),
}

/// Pointer -> instance memo for one resolution pass
///
/// A pointer is marked in-progress before its node is resolved and holds
/// its value once resolution finishes; a resolved entry is never
/// overwritten. Meeting an in-progress pointer again means the pointer
/// depends on itself.
#[derive(Default)]
pub struct InstanceCache {
    slots: HashMap<String, Slot>,
    /// Pointers currently being resolved, outermost first
    stack: Vec<String>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, pointer: &str) -> CacheLookup {
        match self.slots.get(pointer) {
            None => CacheLookup::Miss,
            Some(Slot::InProgress) => CacheLookup::InProgress,
            Some(Slot::Resolved(instance)) => CacheLookup::Resolved(instance.clone()),
        }
    }

    /// Mark `pointer` as being resolved
    pub fn begin(&mut self, pointer: &str) {
        self.slots.entry(pointer.to_string()).or_insert(Slot::InProgress);
        self.stack.push(pointer.to_string());
    }

    /// Store the resolved value for a pointer marked by [`begin`](Self::begin)
    pub fn complete(&mut self, pointer: &str, instance: Instance) {
        if let Some(slot) = self.slots.get_mut(pointer) {
            if matches!(slot, Slot::InProgress) {
                *slot = Slot::Resolved(instance);
            }
        }
        self.pop(pointer);
    }

    /// Drop the in-progress marker after a failure
    pub fn abandon(&mut self, pointer: &str) {
        if matches!(self.slots.get(pointer), Some(Slot::InProgress)) {
            self.slots.remove(pointer);
        }
        self.pop(pointer);
    }

    fn pop(&mut self, pointer: &str) {
        if self.stack.last().map(String::as_str) == Some(pointer) {
            self.stack.pop();
        }
    }

    /// The chain from the first in-progress occurrence of `pointer` back to
    /// `pointer` itself, e.g. `["/a", "/b", "/a"]`
    ///
    /// Every location being resolved is on the stack, so nested locations
    /// between the two occurrences appear too.
    pub fn cycle_chain(&self, pointer: &str) -> Vec<String> {
        let start = self.stack.iter().position(|p| p == pointer).unwrap_or(0);
        let mut chain: Vec<String> = self.stack[start..].to_vec();
        chain.push(pointer.to_string());
        chain
    }

    /// Number of resolved entries
    pub fn len(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Resolved(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for InstanceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceCache")
            .field("resolved", &self.len())
            .field("in_progress", &self.stack)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut cache = InstanceCache::new();
        assert!(matches!(cache.lookup("/a"), CacheLookup::Miss));

        cache.begin("/a");
        assert!(matches!(cache.lookup("/a"), CacheLookup::InProgress));
        assert!(cache.is_empty());

        cache.complete("/a", Instance::from(1i64));
        assert!(matches!(cache.lookup("/a"), CacheLookup::Resolved(v) if v.as_i64() == Some(1)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_resolved_entries_are_write_once() {
        let mut cache = InstanceCache::new();
        cache.begin("/a");
        cache.complete("/a", Instance::from(1i64));

        cache.complete("/a", Instance::from(2i64));
        assert!(matches!(cache.lookup("/a"), CacheLookup::Resolved(v) if v.as_i64() == Some(1)));

        cache.abandon("/a");
        assert!(matches!(cache.lookup("/a"), CacheLookup::Resolved(_)));
    }

    #[test]
    fn test_abandon_clears_marker() {
        let mut cache = InstanceCache::new();
        cache.begin("/a");
        cache.abandon("/a");
        assert!(matches!(cache.lookup("/a"), CacheLookup::Miss));
    }

    #[test]
    fn test_cycle_chain() {
        let mut cache = InstanceCache::new();
        cache.begin("/root");
        cache.begin("/a");
        cache.begin("/b");

        assert_eq!(cache.cycle_chain("/a"), vec!["/a", "/b", "/a"]);
    }
}
