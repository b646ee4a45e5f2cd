// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calendar ticks and labels for time axes.
//!
//! Time values are `f64` milliseconds since the Unix epoch, interpreted in UTC.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Largest magnitude (in ms) we hand to chrono; well inside its supported range.
const MAX_ABS_MS: f64 = 8.0e15;

/// Converts a calendar date to UTC-midnight epoch milliseconds.
pub fn date_to_ms(date: NaiveDate) -> f64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() as f64
}

fn to_datetime(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() || ms.abs() > MAX_ABS_MS {
        return None;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "finite and bounded by MAX_ABS_MS"
    )]
    let ms = ms.floor() as i64;
    DateTime::from_timestamp_millis(ms)
}

fn month_start_ms(year: i32, month0: u32) -> Option<f64> {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).map(date_to_ms)
}

/// Returns the first instant of each month that falls inside `[min, max]`.
///
/// With `every > 1`, only months whose zero-based index is a multiple of `every` are kept
/// (so `every = 3` yields calendar quarters).
pub fn month_ticks(mut min: f64, mut max: f64, every: u32) -> Vec<f64> {
    let mut out = Vec::new();
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let Some(start) = to_datetime(min) else {
        return out;
    };
    if to_datetime(max).is_none() {
        return out;
    }
    let every = every.max(1);

    let mut year = start.year();
    let mut month0 = start.month0();
    // Bound the walk so pathological domains can't spin forever.
    for _ in 0..120_000 {
        let Some(t) = month_start_ms(year, month0) else {
            break;
        };
        if t > max {
            break;
        }
        if t >= min && month0 % every == 0 {
            out.push(t);
        }
        month0 += 1;
        if month0 == 12 {
            month0 = 0;
            year += 1;
        }
    }
    out
}

/// Formats a timestamp with a chrono `strftime` pattern (for example `"%b"` or `"%b %y"`).
///
/// Out-of-range timestamps and invalid patterns yield an empty string.
pub fn format_month(ms: f64, pattern: &str) -> String {
    let mut out = String::new();
    if let Some(dt) = to_datetime(ms)
        && write!(out, "{}", dt.format(pattern)).is_err()
    {
        out.clear();
    }
    out
}
