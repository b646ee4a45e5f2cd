// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input tables.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::ids::{ColId, TableId};

/// Read access to numeric table data.
///
/// Only `f64` cells are modelled; categorical columns are encoded as indices by the caller.
pub trait TableData: core::fmt::Debug {
    /// Number of rows available.
    fn row_count(&self) -> usize;

    /// Returns the value at `(row, col)`, or `None` if either is out of range.
    fn f64(&self, row: usize, col: ColId) -> Option<f64>;
}

/// A table registered in a [`crate::Scene`].
#[derive(Debug)]
pub struct Table {
    /// Table identity.
    pub id: TableId,
    /// Bumped whenever `row_keys` or `data` are replaced.
    pub version: u64,
    /// Stable keys, one per row.
    pub row_keys: Vec<u64>,
    /// Data accessor; `None` for tables that only carry keys.
    pub data: Option<Box<dyn TableData>>,
}

impl Table {
    /// Creates an empty table at version 1.
    pub fn new(id: TableId) -> Self {
        Self {
            id,
            version: 1,
            row_keys: Vec::new(),
            data: None,
        }
    }

    /// Marks the table as changed.
    pub fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Number of rows, bounded by both the keys and the data accessor.
    pub fn row_count(&self) -> usize {
        match self.data.as_deref() {
            Some(data) => data.row_count().min(self.row_keys.len()),
            None => 0,
        }
    }

    /// Reads a cell through the data accessor.
    pub fn f64(&self, row: usize, col: ColId) -> Option<f64> {
        if row >= self.row_keys.len() {
            return None;
        }
        self.data.as_deref()?.f64(row, col)
    }
}
