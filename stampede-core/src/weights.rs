//! Action weight tables

use crate::error::{CoreError, Result};
use crate::types::ActionKind;
use serde::{Deserialize, Serialize};

/// A single row of a weight table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub action: ActionKind,
    pub weight: u32,
}

/// Ordered action → weight table.
///
/// Order is significant: cumulative selection walks the rows in this order,
/// so the same seed always yields the same action sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable {
    entries: Vec<WeightEntry>,
}

impl WeightTable {
    /// Build a table, rejecting duplicate actions
    pub fn new(entries: impl IntoIterator<Item = (ActionKind, u32)>) -> Result<Self> {
        let mut table = Vec::new();
        for (action, weight) in entries {
            if table.iter().any(|e: &WeightEntry| e.action == action) {
                return Err(CoreError::DuplicateAction(action.to_string()));
            }
            table.push(WeightEntry { action, weight });
        }
        Ok(Self { entries: table })
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionKind, u32)> + '_ {
        self.entries.iter().map(|e| (e.action, e.weight))
    }

    /// Weight of an action, 0 if absent
    pub fn weight(&self, action: ActionKind) -> u32 {
        self.entries
            .iter()
            .find(|e| e.action == action)
            .map(|e| e.weight)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.weight as u64).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check for duplicate rows, e.g. after deserialisation
    pub fn validate(&self) -> Result<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|e| e.action == entry.action) {
                return Err(CoreError::DuplicateAction(entry.action.to_string()));
            }
        }
        Ok(())
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        use ActionKind::*;
        Self {
            entries: [
                (ListItems, 30),
                (SearchItems, 10),
                (ViewItem, 25),
                (CreateItem, 15),
                (UpdateItem, 10),
                (ViewDashboard, 5),
                (ViewProfile, 5),
            ]
            .into_iter()
            .map(|(action, weight)| WeightEntry { action, weight })
            .collect(),
        }
    }
}
