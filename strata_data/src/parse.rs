// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lenient cell parsing.

use chrono::NaiveDate;

/// Date formats tried by [`parse_date`], in order.
///
/// Month-only formats resolve to the first day of the month.
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y-%m", "%b %Y", "%B %Y"];

/// Parses a date cell, trying each of [`DATE_FORMATS`] in turn.
///
/// Surrounding whitespace is ignored. Month names are matched case-insensitively.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS.iter().find_map(|format| parse_with(text, format))
}

fn parse_with(text: &str, format: &str) -> Option<NaiveDate> {
    if format.contains("%d") {
        return NaiveDate::parse_from_str(text, format).ok();
    }
    // chrono refuses to build a date without a day, so pin it to the first.
    NaiveDate::parse_from_str(&format!("{text} 1"), &format!("{format} %d")).ok()
}

/// Converts a cell to a number with JavaScript unary-plus rules, mapping `NaN` to 0.
///
/// - blank cells are 0;
/// - `Infinity` (optionally signed) is kept as infinity;
/// - unsigned `0x`, `0o` and `0b` prefixes select the radix;
/// - anything else must be a plain decimal literal, otherwise the cell reads as 0.
pub fn coerce_number(text: &str) -> f64 {
    let value = unary_plus(text.trim());
    if value.is_nan() { 0.0 } else { value }
}

fn unary_plus(text: &str) -> f64 {
    match text {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&text[2..], radix);
    }

    // Rust's float grammar also accepts `inf` and `nan` spellings; JavaScript does not.
    if !text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return f64::NAN;
    }
    text.parse().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0, |acc, c| {
            c.to_digit(radix)
                .map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn dates_try_each_format_in_order() {
        assert_eq!(parse_date("2023-03-15"), ymd(2023, 3, 15));
        assert_eq!(parse_date("2023-03"), ymd(2023, 3, 1));
        assert_eq!(parse_date("Mar 2023"), ymd(2023, 3, 1));
        assert_eq!(parse_date("March 2023"), ymd(2023, 3, 1));
        assert_eq!(parse_date("  2024-11 "), ymd(2024, 11, 1));
    }

    #[test]
    fn unparseable_dates_are_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("2023-13"), None);
        assert_eq!(parse_date("2023-02-30"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn numbers_follow_unary_plus() {
        assert_eq!(coerce_number("42"), 42.0);
        assert_eq!(coerce_number(" 3.5\t"), 3.5);
        assert_eq!(coerce_number(".5"), 0.5);
        assert_eq!(coerce_number("-2e3"), -2000.0);
        assert_eq!(coerce_number("0x1f"), 31.0);
        assert_eq!(coerce_number("0b101"), 5.0);
        assert_eq!(coerce_number("0o17"), 15.0);
        assert_eq!(coerce_number("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn non_numbers_read_as_zero() {
        for text in [
            "", "  ", "abc", "1,000", "12px", "NaN", "inf", "infinity", "-0x10", "0x", ".",
        ] {
            assert_eq!(coerce_number(text), 0.0, "{text:?}");
        }
    }
}
