// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick label formatting for linear axes.

extern crate alloc;

use alloc::format;
use alloc::string::String;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Formats `v` with just enough decimals to distinguish ticks `step` apart.
///
/// The integer part is grouped by thousands (`1,000`), and `-0` prints as `0`.
pub fn format_tick_with_step(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let digits = precision_for_step(step);
    let mut s = format!("{v:.digits$}");
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s.remove(0);
    }
    group_thousands(&s)
}

fn precision_for_step(step: f64) -> usize {
    let step = step.abs();
    if !step.is_finite() || step == 0.0 || step >= 1.0 {
        return 0;
    }
    // Nudge so that exact powers of ten do not lose a digit to rounding in `log10`.
    let exponent = (step.log10() + 1.0e-9).floor();
    let digits = (-exponent).clamp(0.0, 20.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value is clamped to a small non-negative range"
    )]
    {
        digits as usize
    }
}

fn group_thousands(s: &str) -> String {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int, frac) = match rest.find('.') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    let mut out = String::with_capacity(s.len() + int.len() / 3);
    out.push_str(sign);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push_str(frac);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_steps_group_thousands() {
        assert_eq!(format_tick_with_step(0.0, 500.0), "0");
        assert_eq!(format_tick_with_step(1000.0, 500.0), "1,000");
        assert_eq!(format_tick_with_step(-1_234_567.0, 1.0), "-1,234,567");
        assert_eq!(format_tick_with_step(999.0, 1.0), "999");
    }

    #[test]
    fn fractional_steps_keep_matching_decimals() {
        assert_eq!(format_tick_with_step(0.5, 0.5), "0.5");
        assert_eq!(format_tick_with_step(1.0, 0.5), "1.0");
        assert_eq!(format_tick_with_step(0.25, 0.05), "0.25");
        assert_eq!(format_tick_with_step(0.1, 0.1), "0.1");
        assert_eq!(format_tick_with_step(-0.0001, 0.1), "0.0");
    }
}
