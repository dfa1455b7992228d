//! Per-combatant status effect bag

use crate::core::StatusId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from status identifier to stack count
///
/// Uses BTreeMap for deterministic iteration order. An entry whose count
/// reaches zero is removed, so `len()` counts only active statuses. Counts
/// may be negative for statuses the rules allow to go below zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    stacks: BTreeMap<StatusId, i32>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stack count (0 when absent)
    pub fn stacks(&self, status: &StatusId) -> i32 {
        self.stacks.get(status).copied().unwrap_or(0)
    }

    pub fn has(&self, status: &StatusId) -> bool {
        self.stacks.contains_key(status)
    }

    /// Overwrite the stack count; a total of 0 removes the entry
    pub fn set(&mut self, status: StatusId, total: i32) {
        if total == 0 {
            self.stacks.remove(&status);
        } else {
            self.stacks.insert(status, total);
        }
    }

    /// Reduce a positive count by one (used for duration statuses)
    ///
    /// Returns the new count.
    pub fn decay(&mut self, status: &StatusId) -> i32 {
        let current = self.stacks(status);
        if current <= 0 {
            return current;
        }
        self.set(status.clone(), current - 1);
        current - 1
    }

    pub fn remove(&mut self, status: &StatusId) -> Option<i32> {
        self.stacks.remove(status)
    }

    pub fn clear(&mut self) {
        self.stacks.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StatusId, i32)> {
        self.stacks.iter().map(|(id, count)| (id, *count))
    }

    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}
