//! `Cell` and `CellId`: the biological cells carried by a population.

use crate::data::cell_data::CellData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a cell, independent of where the population stores it.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct CellId(u64);

impl CellId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        CellId(raw)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CellId").field(&self.0).finish()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live cell and its variable store.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    id: CellId,
    data: CellData,
}

impl Cell {
    pub fn new(id: u64) -> Self {
        Self {
            id: CellId::new(id),
            data: CellData::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> CellId {
        self.id
    }

    #[inline]
    pub fn data(&self) -> &CellData {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut CellData {
        &mut self.data
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(CellId, u64);
}
