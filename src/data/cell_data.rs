//! Per-cell scalar storage keyed by variable name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named scalar values attached to a single cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CellData {
    items: BTreeMap<String, f64>,
}

impl CellData {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or overwrites) the value stored under `name`.
    pub fn set_item(&mut self, name: impl Into<String>, value: f64) {
        self.items.insert(name.into(), value);
    }

    /// Value stored under `name`, if any.
    pub fn get_item(&self, name: &str) -> Option<f64> {
        self.items.get(name).copied()
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Number of stored variables.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Variable names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}
