// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned numeric tables used by the transform executor.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use strata_core::{ColId, Table, TableData, TableId};

/// Errors returned when building or using a [`TableFrame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableFrameError {
    /// The requested column list is empty.
    EmptyColumns,
    /// The input table does not have a data accessor.
    MissingData,
    /// A column's length does not match the number of row keys.
    RaggedColumn {
        /// Offending column.
        col: ColId,
        /// Its length.
        len: usize,
        /// The number of row keys.
        rows: usize,
    },
}

impl fmt::Display for TableFrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyColumns => f.write_str("table frame needs at least one column"),
            Self::MissingData => f.write_str("table has no data accessor"),
            Self::RaggedColumn { col, len, rows } => write!(
                f,
                "column {} has {len} values but the frame has {rows} rows",
                col.0
            ),
        }
    }
}

impl core::error::Error for TableFrameError {}

/// An owned, columnar `f64` table.
///
/// Row identity travels in `row_keys`; every transform keeps the keys of the rows it keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct TableFrame {
    /// Stable keys for each row.
    pub row_keys: Vec<u64>,
    /// Column ids carried by this frame.
    pub columns: Vec<ColId>,
    /// Columnar numeric data, aligned to `columns`.
    pub data: Vec<Vec<f64>>,
}

impl TableFrame {
    /// Creates an empty frame.
    pub fn new(columns: Vec<ColId>) -> Result<Self, TableFrameError> {
        if columns.is_empty() {
            return Err(TableFrameError::EmptyColumns);
        }
        let data = columns.iter().map(|_| Vec::new()).collect();
        Ok(Self {
            row_keys: Vec::new(),
            columns,
            data,
        })
    }

    /// Builds a frame from keys and `(column, values)` pairs.
    pub fn from_columns(
        row_keys: Vec<u64>,
        columns: impl IntoIterator<Item = (ColId, Vec<f64>)>,
    ) -> Result<Self, TableFrameError> {
        let rows = row_keys.len();
        let mut ids = Vec::new();
        let mut data = Vec::new();
        for (col, values) in columns {
            if values.len() != rows {
                return Err(TableFrameError::RaggedColumn {
                    col,
                    len: values.len(),
                    rows,
                });
            }
            ids.push(col);
            data.push(values);
        }
        if ids.is_empty() {
            return Err(TableFrameError::EmptyColumns);
        }
        Ok(Self {
            row_keys,
            columns: ids,
            data,
        })
    }

    /// Extracts a frame from a `strata_core` table.
    ///
    /// Missing values are represented as `NaN`.
    pub fn from_table(table: &Table, columns: Vec<ColId>) -> Result<Self, TableFrameError> {
        if columns.is_empty() {
            return Err(TableFrameError::EmptyColumns);
        }
        let Some(data) = table.data.as_deref() else {
            return Err(TableFrameError::MissingData);
        };
        let n = table.row_keys.len();
        let cols = columns
            .iter()
            .map(|&col| {
                (0..n)
                    .map(|row| data.f64(row, col).unwrap_or(f64::NAN))
                    .collect()
            })
            .collect();
        Ok(Self {
            row_keys: table.row_keys.clone(),
            columns,
            data: cols,
        })
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_keys.len()
    }

    /// Returns a column index for a `ColId`, if present.
    pub fn column_index(&self, col: ColId) -> Option<usize> {
        self.columns.iter().position(|&c| c == col)
    }

    /// Returns a whole column.
    pub fn column(&self, col: ColId) -> Option<&[f64]> {
        let ci = self.column_index(col)?;
        self.data.get(ci).map(Vec::as_slice)
    }

    /// Gets a value for a row/col if both exist.
    pub fn f64(&self, row: usize, col: ColId) -> Option<f64> {
        self.column(col)?.get(row).copied()
    }

    /// Copies the given rows (in the given order) and columns into a new frame.
    ///
    /// Returns `None` if a column is missing.
    pub(crate) fn select(&self, rows: &[usize], columns: &[ColId]) -> Option<Self> {
        let mut data = Vec::with_capacity(columns.len());
        for &col in columns {
            let src = self.column(col)?;
            data.push(rows.iter().map(|&r| src[r]).collect());
        }
        Some(Self {
            row_keys: rows.iter().map(|&r| self.row_keys[r]).collect(),
            columns: columns.to_vec(),
            data,
        })
    }

    /// Converts this frame into a `strata_core::Table` with an owned accessor.
    pub fn into_table(self, id: TableId) -> Table {
        Table {
            id,
            version: 1,
            row_keys: self.row_keys,
            data: Some(Box::new(FrameData {
                columns: self.columns,
                data: self.data,
            })),
        }
    }
}

#[derive(Debug)]
struct FrameData {
    columns: Vec<ColId>,
    data: Vec<Vec<f64>>,
}

impl TableData for FrameData {
    fn row_count(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    fn f64(&self, row: usize, col: ColId) -> Option<f64> {
        let idx = self.columns.iter().position(|&c| c == col)?;
        self.data.get(idx)?.get(row).copied()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn ragged_columns_are_rejected() {
        let err = TableFrame::from_columns(vec![1, 2], [(ColId(0), vec![1.0])]).unwrap_err();
        assert_eq!(
            err,
            TableFrameError::RaggedColumn {
                col: ColId(0),
                len: 1,
                rows: 2
            }
        );
    }

    #[test]
    fn frame_round_trips_through_a_scene_table() {
        let frame = TableFrame::from_columns(
            vec![7, 8],
            [(ColId(0), vec![1.0, 2.0]), (ColId(3), vec![5.0, 6.0])],
        )
        .unwrap();
        let table = frame.clone().into_table(TableId(4));
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.f64(1, ColId(3)), Some(6.0));

        let back = TableFrame::from_table(&table, vec![ColId(3), ColId(9)]).unwrap();
        assert_eq!(back.f64(0, ColId(3)), Some(5.0));
        assert!(back.f64(0, ColId(9)).unwrap().is_nan());
        assert_eq!(back.row_keys, frame.row_keys);
    }
}
