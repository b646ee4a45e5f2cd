// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack layouts over plain value matrices.
//!
//! Values are series-major: `values[i][j]` is series `i` at column (x position) `j`. Results
//! have the same shape, with `(y0, y1)` per cell. Non-finite values count as `0`.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::transform::StackOffset;

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

fn abs(v: f64) -> f64 {
    if v.is_sign_negative() { -v } else { v }
}

/// Stacks a single column (one group) of values in order.
///
/// `max_sum` is the largest absolute group sum across all groups; only
/// [`StackOffset::Center`] uses it. [`StackOffset::Wiggle`] depends on neighbouring columns,
/// so a lone column is stacked from a zero baseline.
pub fn stack_column(values: &[f64], offset: StackOffset, max_sum: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(values.len());
    match offset {
        StackOffset::Zero => {
            let (mut pos, mut neg) = (0.0, 0.0);
            for &v in values {
                let v = finite_or_zero(v);
                if v < 0.0 {
                    out.push((neg, neg + v));
                    neg += v;
                } else {
                    out.push((pos, pos + v));
                    pos += v;
                }
            }
        }
        StackOffset::Center => {
            let sum: f64 = values.iter().map(|&v| abs(finite_or_zero(v))).sum();
            let mut last = (max_sum - sum) / 2.0;
            for &v in values {
                let next = last + abs(finite_or_zero(v));
                out.push((last, next));
                last = next;
            }
        }
        StackOffset::Normalize => {
            let sum: f64 = values.iter().map(|&v| abs(finite_or_zero(v))).sum();
            let scale = if sum > 0.0 { 1.0 / sum } else { 0.0 };
            let mut acc = 0.0;
            let mut last = 0.0;
            for &v in values {
                acc += abs(finite_or_zero(v));
                let next = acc * scale;
                out.push((last, next));
                last = next;
            }
        }
        StackOffset::Wiggle => {
            let mut base = 0.0;
            for &v in values {
                let v = finite_or_zero(v);
                out.push((base, base + v));
                base += v;
            }
        }
    }
    out
}

/// Stacks a series-major matrix with the given offset.
///
/// Rows shorter than the first series are treated as padded with zeros.
pub fn stack_series(values: &[Vec<f64>], offset: StackOffset) -> Vec<Vec<(f64, f64)>> {
    let n = values.len();
    let m = values.first().map_or(0, Vec::len);
    if n == 0 || m == 0 {
        return values.iter().map(|_| Vec::new()).collect();
    }
    let at = |i: usize, j: usize| finite_or_zero(values[i].get(j).copied().unwrap_or(0.0));

    match offset {
        StackOffset::Wiggle => wiggle(n, m, at),
        _ => {
            let columns: Vec<Vec<f64>> = (0..m)
                .map(|j| (0..n).map(|i| at(i, j)).collect())
                .collect();
            let max_sum = columns
                .iter()
                .map(|c| c.iter().map(|&v| abs(v)).sum::<f64>())
                .fold(0.0, f64::max);
            let mut out = vec![Vec::with_capacity(m); n];
            for column in &columns {
                for (i, cell) in stack_column(column, offset, max_sum).into_iter().enumerate() {
                    out[i].push(cell);
                }
            }
            out
        }
    }
}

/// D3's `stackOffsetWiggle` followed by the `none` accumulation.
fn wiggle(n: usize, m: usize, at: impl Fn(usize, usize) -> f64) -> Vec<Vec<(f64, f64)>> {
    let mut baseline = vec![0.0; m];
    let mut y = 0.0;
    for j in 1..m {
        let mut s1 = 0.0;
        let mut s2 = 0.0;
        let mut below = 0.0;
        for i in 0..n {
            let cur = at(i, j);
            let prev = at(i, j - 1);
            let s3 = (cur - prev) / 2.0 + below;
            below += cur - prev;
            s1 += cur;
            s2 += s3 * cur;
        }
        baseline[j - 1] = y;
        if s1 != 0.0 {
            y -= s2 / s1;
        }
    }
    baseline[m - 1] = y;

    let mut out = Vec::with_capacity(n);
    let mut floor = baseline;
    for i in 0..n {
        let mut layer = Vec::with_capacity(m);
        for (j, base) in floor.iter_mut().enumerate() {
            let top = *base + at(i, j);
            layer.push((*base, top));
            *base = top;
        }
        out.push(layer);
    }
    out
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        abs(a - b) < 1e-9
    }

    #[test]
    fn zero_offset_diverges_around_zero() {
        let out = stack_column(&[2.0, -1.0, 3.0, -4.0], StackOffset::Zero, 0.0);
        assert_eq!(out, vec![(0.0, 2.0), (0.0, -1.0), (2.0, 5.0), (-1.0, -5.0)]);
    }

    #[test]
    fn center_and_normalize_use_absolute_sums() {
        let values = vec![vec![1.0, 2.0], vec![1.0, 4.0]];
        let centered = stack_series(&values, StackOffset::Center);
        // Column sums are 2 and 6, so column 0 is shifted by 2.
        assert_eq!(centered[0][0], (2.0, 3.0));
        assert_eq!(centered[1][0], (3.0, 4.0));
        assert_eq!(centered[1][1], (2.0, 6.0));

        let normalized = stack_series(&values, StackOffset::Normalize);
        assert!(close(normalized[1][0].1, 1.0));
        assert!(close(normalized[0][1].1, 1.0 / 3.0));
    }

    #[test]
    fn wiggle_matches_d3_reference_values() {
        // Reference computed with d3.stack().offset(d3.stackOffsetWiggle).
        let values = vec![vec![1.0, 3.0, 2.0], vec![2.0, 1.0, 4.0]];
        let out = stack_series(&values, StackOffset::Wiggle);

        // Column 1: s1 = 4, s2 = 1*3 + (-0.5 + 2)*1 = 4.5, so y = -1.125.
        // Column 2: s1 = 6, s2 = (-0.5)*2 + (1.5 - 1)*4 = 1, so y = -1.125 - 1/6.
        let y1 = -1.125;
        let y2 = -1.125 - 1.0 / 6.0;
        assert_eq!(out[0][0], (0.0, 1.0));
        assert!(close(out[0][1].0, y1) && close(out[0][1].1, y1 + 3.0));
        assert!(close(out[0][2].0, y2) && close(out[0][2].1, y2 + 2.0));
        assert!(close(out[1][1].0, y1 + 3.0) && close(out[1][1].1, y1 + 4.0));
        assert!(close(out[1][2].1, y2 + 6.0));
    }

    #[test]
    fn wiggle_treats_non_finite_as_zero_and_handles_silent_columns() {
        let values = vec![vec![f64::NAN, 0.0, 5.0], vec![0.0, 0.0, f64::INFINITY]];
        let out = stack_series(&values, StackOffset::Wiggle);
        // Column 1 sums to zero, so the baseline does not move.
        assert_eq!(out[0][0], (0.0, 0.0));
        assert_eq!(out[0][1], (0.0, 0.0));
        // Column 2: s1 = 5, s2 = 2.5 * 5, y = -2.5.
        assert!(close(out[0][2].0, -2.5));
        assert!(close(out[1][2].0, 2.5) && close(out[1][2].1, 2.5));
    }

    #[test]
    fn empty_inputs_stack_to_empty_layers() {
        assert!(stack_series(&[], StackOffset::Wiggle).is_empty());
        let out = stack_series(&[vec![], vec![]], StackOffset::Zero);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(Vec::is_empty));
    }
}
