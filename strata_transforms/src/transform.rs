// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform IR types.

extern crate alloc;

use alloc::vec::Vec;

use strata_core::{ColId, TableId};

/// Stack baseline offset mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOffset {
    /// Positive values stack upward from 0, negative values downward.
    #[default]
    Zero,
    /// Stack absolute values and shift each group so it is centered against the largest
    /// group sum.
    Center,
    /// Stack absolute values and scale each group so its total height is `1.0`.
    Normalize,
    /// Streamgraph baseline that minimizes the weighted change in slope across layers.
    ///
    /// This follows D3's `stackOffsetWiggle`. Groups are treated as ordered columns (in
    /// first-appearance order) and the per-group sort key identifies the series, so a
    /// [`Transform::Stack`] using this offset needs `sort_by`.
    Wiggle,
}

/// Sorting order for [`Transform::Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

/// Comparison operators for numeric predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==` (exact float equality)
    Eq,
    /// `!=` (exact float inequality)
    Ne,
}

/// A single numeric comparison used by [`Transform::Filter`].
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Column to read.
    pub col: ColId,
    /// Comparison operator.
    pub op: CompareOp,
    /// Right-hand constant.
    pub value: f64,
}

impl Predicate {
    /// Creates a predicate `col <op> value`.
    pub fn new(col: ColId, op: CompareOp, value: f64) -> Self {
        Self { col, op, value }
    }

    /// Shorthand for `col == value`.
    pub fn equals(col: ColId, value: f64) -> Self {
        Self::new(col, CompareOp::Eq, value)
    }

    /// Evaluates the predicate. `NaN` only satisfies [`CompareOp::Ne`].
    pub fn eval(&self, v: f64) -> bool {
        match self.op {
            CompareOp::Lt => v < self.value,
            CompareOp::Le => v <= self.value,
            CompareOp::Gt => v > self.value,
            CompareOp::Ge => v >= self.value,
            CompareOp::Eq => v == self.value,
            CompareOp::Ne => v != self.value,
        }
    }
}

/// A table transform from an input table to an output table.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// Keep only rows that satisfy a predicate.
    Filter {
        /// Input table.
        input: TableId,
        /// Output table.
        output: TableId,
        /// Predicate to apply per row.
        predicate: Predicate,
        /// Columns to carry through to the output table.
        columns: Vec<ColId>,
    },
    /// Select a subset of columns.
    Project {
        /// Input table.
        input: TableId,
        /// Output table.
        output: TableId,
        /// Columns to include in the output table.
        columns: Vec<ColId>,
    },
    /// Reorder rows by a numeric key column.
    ///
    /// The sort is stable; `NaN` keys go last in either order.
    Sort {
        /// Input table.
        input: TableId,
        /// Output table.
        output: TableId,
        /// Column used as the sort key.
        by: ColId,
        /// Sort order.
        order: SortOrder,
        /// Columns to carry through to the output table.
        columns: Vec<ColId>,
    },
    /// Compute a stack layout, writing start/end offsets per row.
    ///
    /// Output columns are `columns` (in order) followed by `output_start`, `output_end`.
    /// The output keeps the input row order.
    Stack {
        /// Input table.
        input: TableId,
        /// Output table.
        output: TableId,
        /// Key columns defining independent stacks (one stack per distinct key).
        group_by: Vec<ColId>,
        /// Baseline offset mode.
        offset: StackOffset,
        /// Optional per-group sort key; rows are stacked in this order within a group.
        sort_by: Option<ColId>,
        /// Sort order when `sort_by` is set.
        sort_order: SortOrder,
        /// Input column providing the value to accumulate.
        field: ColId,
        /// Output column containing the stack start offset.
        output_start: ColId,
        /// Output column containing the stack end offset.
        output_end: ColId,
        /// Columns to carry through to the output table.
        columns: Vec<ColId>,
    },
}

impl Transform {
    /// The table this transform reads.
    pub fn input(&self) -> TableId {
        match self {
            Self::Filter { input, .. }
            | Self::Project { input, .. }
            | Self::Sort { input, .. }
            | Self::Stack { input, .. } => *input,
        }
    }

    /// The table this transform writes.
    pub fn output(&self) -> TableId {
        match self {
            Self::Filter { output, .. }
            | Self::Project { output, .. }
            | Self::Sort { output, .. }
            | Self::Stack { output, .. } => *output,
        }
    }

    /// Every input column this transform reads.
    pub fn required_columns(&self) -> Vec<ColId> {
        let mut cols = Vec::new();
        match self {
            Self::Filter {
                predicate, columns, ..
            } => {
                cols.extend_from_slice(columns);
                cols.push(predicate.col);
            }
            Self::Project { columns, .. } => cols.extend_from_slice(columns),
            Self::Sort { by, columns, .. } => {
                cols.extend_from_slice(columns);
                cols.push(*by);
            }
            Self::Stack {
                group_by,
                sort_by,
                field,
                columns,
                ..
            } => {
                cols.extend_from_slice(columns);
                cols.extend_from_slice(group_by);
                cols.extend(sort_by.iter().copied());
                cols.push(*field);
            }
        }
        cols.sort_by_key(|c| c.0);
        cols.dedup();
        cols
    }
}
