// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full-recompute transform executor.

extern crate alloc;

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use hashbrown::HashMap;
use strata_core::{ColId, TableId};

use crate::stack::{stack_column, stack_series};
use crate::table::TableFrame;
use crate::transform::{SortOrder, StackOffset, Transform};

/// Errors returned by [`Program::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// A transform reads a table that is neither an input nor produced upstream.
    MissingInput(TableId),
    /// A transform reads a column its input table does not carry.
    MissingColumn {
        /// The input table.
        table: TableId,
        /// The missing column.
        col: ColId,
    },
    /// A wiggle stack was configured without `sort_by`.
    WiggleNeedsSortKey(TableId),
    /// A wiggle stack saw two rows with the same group and sort key.
    DuplicateStackEntry {
        /// The input table.
        table: TableId,
        /// Key of the second row.
        row_key: u64,
    },
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput(t) => write!(f, "table {} is not available", t.0),
            Self::MissingColumn { table, col } => {
                write!(f, "table {} has no column {}", table.0, col.0)
            }
            Self::WiggleNeedsSortKey(t) => {
                write!(f, "wiggle stack over table {} needs a sort key", t.0)
            }
            Self::DuplicateStackEntry { table, row_key } => write!(
                f,
                "row {row_key} of table {} repeats a (group, series) pair",
                table.0
            ),
        }
    }
}

impl core::error::Error for ExecutionError {}

/// Tables produced by a [`Program`], keyed by output id.
#[derive(Debug, Clone, Default)]
pub struct ProgramOutput {
    /// Output tables.
    pub tables: HashMap<TableId, TableFrame>,
}

impl ProgramOutput {
    /// Returns an output table.
    pub fn get(&self, id: TableId) -> Option<&TableFrame> {
        self.tables.get(&id)
    }
}

/// An ordered list of transforms.
///
/// Later transforms may read the outputs of earlier ones. Every run recomputes everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    transforms: Vec<Transform>,
}

impl Program {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transform.
    pub fn push(&mut self, transform: Transform) {
        self.transforms.push(transform);
    }

    /// Builder-style [`Program::push`].
    pub fn with(mut self, transform: Transform) -> Self {
        self.push(transform);
        self
    }

    /// The transforms, in execution order.
    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    /// Runs every transform against `inputs`.
    ///
    /// The output contains every table written by the program (not the inputs).
    pub fn execute(
        &self,
        inputs: &HashMap<TableId, TableFrame>,
    ) -> Result<ProgramOutput, ExecutionError> {
        let mut out = ProgramOutput::default();
        for t in &self.transforms {
            let input = t.input();
            let frame = out
                .tables
                .get(&input)
                .or_else(|| inputs.get(&input))
                .ok_or(ExecutionError::MissingInput(input))?;
            let result = run(t, frame)?;
            log::trace!(
                "transform {} -> {}: {} rows",
                input.0,
                t.output().0,
                result.row_count()
            );
            out.tables.insert(t.output(), result);
        }
        Ok(out)
    }
}

fn missing(table: TableId, col: ColId) -> ExecutionError {
    ExecutionError::MissingColumn { table, col }
}

fn run(t: &Transform, frame: &TableFrame) -> Result<TableFrame, ExecutionError> {
    let table = t.input();
    for col in t.required_columns() {
        if frame.column_index(col).is_none() {
            return Err(missing(table, col));
        }
    }
    match t {
        Transform::Filter {
            predicate, columns, ..
        } => {
            let keys = frame.column(predicate.col).ok_or(missing(table, predicate.col))?;
            let rows: Vec<usize> = (0..frame.row_count())
                .filter(|&r| predicate.eval(keys[r]))
                .collect();
            select(frame, table, &rows, columns)
        }
        Transform::Project { columns, .. } => {
            let rows: Vec<usize> = (0..frame.row_count()).collect();
            select(frame, table, &rows, columns)
        }
        Transform::Sort {
            by, order, columns, ..
        } => {
            let keys = frame.column(*by).ok_or(missing(table, *by))?;
            let mut rows: Vec<usize> = (0..frame.row_count()).collect();
            rows.sort_by(|&a, &b| compare_keys(keys[a], keys[b], *order));
            select(frame, table, &rows, columns)
        }
        Transform::Stack {
            group_by,
            offset,
            sort_by,
            sort_order,
            field,
            output_start,
            output_end,
            columns,
            ..
        } => {
            let (y0, y1) = stack(
                frame,
                table,
                group_by,
                *offset,
                *sort_by,
                *sort_order,
                *field,
            )?;
            let rows: Vec<usize> = (0..frame.row_count()).collect();
            let mut out = select(frame, table, &rows, columns)?;
            out.columns.push(*output_start);
            out.data.push(y0);
            out.columns.push(*output_end);
            out.data.push(y1);
            Ok(out)
        }
    }
}

fn select(
    frame: &TableFrame,
    table: TableId,
    rows: &[usize],
    columns: &[ColId],
) -> Result<TableFrame, ExecutionError> {
    frame.select(rows, columns).ok_or_else(|| {
        let col = columns
            .iter()
            .copied()
            .find(|&c| frame.column_index(c).is_none())
            .unwrap_or(ColId(u32::MAX));
        missing(table, col)
    })
}

/// Orders `NaN` last regardless of direction.
fn compare_keys(a: f64, b: f64, order: SortOrder) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        }
    }
}

/// Canonical hash key for a float (`-0.0 == 0.0`, all `NaN`s equal).
fn key_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

fn stack(
    frame: &TableFrame,
    table: TableId,
    group_by: &[ColId],
    offset: StackOffset,
    sort_by: Option<ColId>,
    sort_order: SortOrder,
    field: ColId,
) -> Result<(Vec<f64>, Vec<f64>), ExecutionError> {
    let n = frame.row_count();
    let values = frame.column(field).ok_or(missing(table, field))?;
    let group_cols = group_by
        .iter()
        .map(|&c| frame.column(c).ok_or(missing(table, c)))
        .collect::<Result<Vec<_>, _>>()?;

    // Groups in first-appearance order.
    let mut group_index: HashMap<Vec<u64>, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut row_group = Vec::with_capacity(n);
    for row in 0..n {
        let key: Vec<u64> = group_cols.iter().map(|c| key_bits(c[row])).collect();
        let gi = *group_index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[gi].push(row);
        row_group.push(gi);
    }

    let sort_keys = match sort_by {
        Some(c) => Some(frame.column(c).ok_or(missing(table, c))?),
        None => None,
    };
    if let Some(keys) = sort_keys {
        for g in &mut groups {
            g.sort_by(|&a, &b| compare_keys(keys[a], keys[b], sort_order));
        }
    }

    let mut y0 = alloc::vec![f64::NAN; n];
    let mut y1 = alloc::vec![f64::NAN; n];

    if offset == StackOffset::Wiggle {
        let keys = sort_keys.ok_or(ExecutionError::WiggleNeedsSortKey(table))?;

        // Series are the distinct sort keys, in stacking order.
        let mut series: Vec<f64> = Vec::new();
        let mut series_index: HashMap<u64, usize> = HashMap::new();
        let mut ordered: Vec<usize> = (0..n).collect();
        ordered.sort_by(|&a, &b| compare_keys(keys[a], keys[b], sort_order));
        for &row in &ordered {
            series_index.entry(key_bits(keys[row])).or_insert_with(|| {
                series.push(keys[row]);
                series.len() - 1
            });
        }

        let mut matrix = alloc::vec![alloc::vec![0.0; groups.len()]; series.len()];
        let mut seen = alloc::vec![alloc::vec![None::<usize>; groups.len()]; series.len()];
        for row in 0..n {
            let si = series_index[&key_bits(keys[row])];
            let gi = row_group[row];
            if seen[si][gi].is_some() {
                return Err(ExecutionError::DuplicateStackEntry {
                    table,
                    row_key: frame.row_keys[row],
                });
            }
            seen[si][gi] = Some(row);
            matrix[si][gi] = values[row];
        }

        let stacked = stack_series(&matrix, StackOffset::Wiggle);
        for (si, layer) in stacked.iter().enumerate() {
            for (gi, &(lo, hi)) in layer.iter().enumerate() {
                if let Some(row) = seen[si][gi] {
                    y0[row] = lo;
                    y1[row] = hi;
                }
            }
        }
    } else {
        let group_values: Vec<Vec<f64>> = groups
            .iter()
            .map(|g| g.iter().map(|&r| values[r]).collect())
            .collect();
        let max_sum = group_values
            .iter()
            .map(|vs| {
                vs.iter()
                    .filter(|v| v.is_finite())
                    .map(|&v| if v < 0.0 { -v } else { v })
                    .sum::<f64>()
            })
            .fold(0.0, f64::max);
        for (g, vs) in groups.iter().zip(&group_values) {
            for (&row, (lo, hi)) in g.iter().zip(stack_column(vs, offset, max_sum)) {
                y0[row] = lo;
                y1[row] = hi;
            }
        }
    }

    Ok((y0, y1))
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::transform::Predicate;

    const X: ColId = ColId(0);
    const SERIES: ColId = ColId(1);
    const VALUE: ColId = ColId(2);
    const Y0: ColId = ColId(3);
    const Y1: ColId = ColId(4);
    const SRC: TableId = TableId(1);
    const OUT: TableId = TableId(2);

    fn long_table() -> HashMap<TableId, TableFrame> {
        // Two series over three x positions, rows deliberately interleaved.
        let frame = TableFrame::from_columns(
            vec![10, 11, 12, 13, 14, 15],
            [
                (X, vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0]),
                (SERIES, vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0]),
                (VALUE, vec![2.0, 1.0, 3.0, 1.0, 4.0, 2.0]),
            ],
        )
        .unwrap();
        let mut inputs = HashMap::new();
        inputs.insert(SRC, frame);
        inputs
    }

    fn stack_transform(offset: StackOffset) -> Transform {
        Transform::Stack {
            input: SRC,
            output: OUT,
            group_by: vec![X],
            offset,
            sort_by: Some(SERIES),
            sort_order: SortOrder::Asc,
            field: VALUE,
            output_start: Y0,
            output_end: Y1,
            columns: vec![X, SERIES, VALUE],
        }
    }

    #[test]
    fn zero_stack_preserves_row_order_and_keys() {
        let program = Program::new().with(stack_transform(StackOffset::Zero));
        let out = program.execute(&long_table()).unwrap();
        let frame = out.get(OUT).unwrap();
        assert_eq!(frame.row_keys, vec![10, 11, 12, 13, 14, 15]);
        assert_eq!(frame.columns, vec![X, SERIES, VALUE, Y0, Y1]);
        // Series 0 stacks first within each x.
        assert_eq!(frame.column(Y0).unwrap(), &[1.0, 0.0, 0.0, 3.0, 2.0, 0.0]);
        assert_eq!(frame.column(Y1).unwrap(), &[3.0, 1.0, 3.0, 4.0, 6.0, 2.0]);
    }

    #[test]
    fn wiggle_stack_matches_series_matrix() {
        let program = Program::new().with(stack_transform(StackOffset::Wiggle));
        let out = program.execute(&long_table()).unwrap();
        let frame = out.get(OUT).unwrap();

        let expected = stack_series(
            &[vec![1.0, 3.0, 2.0], vec![2.0, 1.0, 4.0]],
            StackOffset::Wiggle,
        );
        // Row 11 is series 0 at x 0; row 13 is series 1 at x 1.
        assert_eq!(frame.f64(1, Y0), Some(expected[0][0].0));
        assert_eq!(frame.f64(3, Y0), Some(expected[1][1].0));
        assert_eq!(frame.f64(3, Y1), Some(expected[1][1].1));
    }

    #[test]
    fn wiggle_rejects_duplicates_and_missing_sort_key() {
        let mut inputs = long_table();
        let frame = inputs.get_mut(&SRC).unwrap();
        frame.data[1][0] = 0.0;
        let err = Program::new()
            .with(stack_transform(StackOffset::Wiggle))
            .execute(&inputs)
            .unwrap_err();
        assert_eq!(
            err,
            ExecutionError::DuplicateStackEntry {
                table: SRC,
                row_key: 11
            }
        );

        let mut t = stack_transform(StackOffset::Wiggle);
        if let Transform::Stack { sort_by, .. } = &mut t {
            *sort_by = None;
        }
        let err = Program::new().with(t).execute(&long_table()).unwrap_err();
        assert_eq!(err, ExecutionError::WiggleNeedsSortKey(SRC));
    }

    #[test]
    fn chained_filter_then_sort_reads_upstream_output() {
        let program = Program::new()
            .with(Transform::Filter {
                input: SRC,
                output: TableId(5),
                predicate: Predicate::equals(SERIES, 1.0),
                columns: vec![X, VALUE],
            })
            .with(Transform::Sort {
                input: TableId(5),
                output: OUT,
                by: X,
                order: SortOrder::Desc,
                columns: vec![X, VALUE],
            });
        let out = program.execute(&long_table()).unwrap();
        let frame = out.get(OUT).unwrap();
        assert_eq!(frame.row_keys, vec![14, 13, 10]);
        assert_eq!(frame.column(VALUE).unwrap(), &[4.0, 1.0, 2.0]);
    }

    #[test]
    fn missing_inputs_and_columns_are_reported() {
        let err = Program::new()
            .with(Transform::Project {
                input: TableId(9),
                output: OUT,
                columns: vec![X],
            })
            .execute(&long_table())
            .unwrap_err();
        assert_eq!(err, ExecutionError::MissingInput(TableId(9)));

        let err = Program::new()
            .with(Transform::Project {
                input: SRC,
                output: OUT,
                columns: vec![ColId(42)],
            })
            .execute(&long_table())
            .unwrap_err();
        assert_eq!(
            err,
            ExecutionError::MissingColumn {
                table: SRC,
                col: ColId(42)
            }
        );
    }
}
