// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use strata_charts::{StreamData, date_to_ms};

use crate::parse::{coerce_number, parse_date};

/// Header of the date column.
const DATE_COLUMN: &str = "Date";
/// Fallback header when [`DATE_COLUMN`] is missing or blank.
const DATE_COLUMN_FALLBACK: &str = "date";

/// One CSV record as header/cell pairs, in column order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell under `header`.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    /// Sets the cell under `header`, replacing an earlier value for the same header.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(h, _)| *h == header) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((header, value)),
        }
    }

    /// Headers in column order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(h, _)| h.as_str())
    }

    /// The date cell: `Date`, or `date` when that is missing or empty.
    pub fn date_cell(&self) -> Option<&str> {
        self.get(DATE_COLUMN)
            .filter(|v| !v.is_empty())
            .or_else(|| self.get(DATE_COLUMN_FALLBACK))
    }
}

impl<H: Into<String>, V: Into<String>> FromIterator<(H, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (H, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (h, v) in iter {
            row.insert(h, v);
        }
        row
    }
}

/// Construction from loosely typed rows.
pub trait FromRows: Sized {
    /// Builds a value from `rows`, reading the columns named by `keys`.
    fn from_rows(rows: &[RawRow], keys: &[String]) -> Self;
}

impl FromRows for StreamData {
    /// Rows whose date does not parse are dropped with a warning. Missing cells read as 0.
    /// The result is sorted by date; rows sharing a date keep their input order.
    fn from_rows(rows: &[RawRow], keys: &[String]) -> Self {
        let mut data = Self::new(keys.iter().cloned());
        let mut dropped = 0_usize;
        for (index, row) in rows.iter().enumerate() {
            let Some(date) = row.date_cell().and_then(parse_date) else {
                log::warn!(
                    "dropping row {index}: unparseable date {:?}",
                    row.date_cell().unwrap_or_default()
                );
                dropped += 1;
                continue;
            };
            let values = keys
                .iter()
                .map(|k| row.get(k).map_or(0.0, coerce_number))
                .collect();
            data.push_row(date_to_ms(date), values);
        }
        data.rows.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
        log::debug!(
            "read {} rows for {} series ({dropped} dropped)",
            data.len(),
            keys.len()
        );
        data
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn keys() -> Vec<String> {
        vec!["GPT-4".to_string(), "Gemini".to_string()]
    }

    fn ms(y: i32, m: u32) -> f64 {
        date_to_ms(NaiveDate::from_ymd_opt(y, m, 1).unwrap())
    }

    #[test]
    fn insert_replaces_and_keeps_order() {
        let mut row: RawRow = [("a", "1"), ("b", "2")].into_iter().collect();
        row.insert("a", "3");
        assert_eq!(row.get("a"), Some("3"));
        assert_eq!(row.headers().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn date_cell_falls_back_to_lowercase() {
        let upper: RawRow = [("Date", "2023-01"), ("date", "2024-01")]
            .into_iter()
            .collect();
        assert_eq!(upper.date_cell(), Some("2023-01"));
        let blank: RawRow = [("Date", ""), ("date", "2024-01")].into_iter().collect();
        assert_eq!(blank.date_cell(), Some("2024-01"));
        let lower: RawRow = [("date", "2024-02")].into_iter().collect();
        assert_eq!(lower.date_cell(), Some("2024-02"));
        assert_eq!(RawRow::new().date_cell(), None);
    }

    #[test]
    fn rows_are_sorted_and_coerced() {
        let rows: Vec<RawRow> = vec![
            [("Date", "2023-03"), ("GPT-4", "3"), ("Gemini", "x")]
                .into_iter()
                .collect(),
            [("Date", "Jan 2023"), ("GPT-4", "1")].into_iter().collect(),
            [("Date", "2023-02-01"), ("GPT-4", " 2 "), ("Gemini", "0x10")]
                .into_iter()
                .collect(),
        ];
        let data = StreamData::from_rows(&rows, &keys());

        assert_eq!(data.keys, keys());
        assert_eq!(data.times(), [ms(2023, 1), ms(2023, 2), ms(2023, 3)]);
        assert_eq!(data.values_of("GPT-4"), [1.0, 2.0, 3.0]);
        assert_eq!(data.values_of("Gemini"), [0.0, 16.0, 0.0]);
    }

    #[test]
    fn bad_dates_are_dropped_and_ties_keep_input_order() {
        let rows: Vec<RawRow> = vec![
            [("Date", "2023-02"), ("GPT-4", "1")].into_iter().collect(),
            [("Date", "someday"), ("GPT-4", "9")].into_iter().collect(),
            [("GPT-4", "9")].into_iter().collect(),
            [("Date", "Feb 2023"), ("GPT-4", "2")].into_iter().collect(),
            [("Date", "2023-01"), ("GPT-4", "3")].into_iter().collect(),
        ];
        let data = StreamData::from_rows(&rows, &keys());

        assert_eq!(data.len(), 3);
        assert_eq!(data.values_of("GPT-4"), [3.0, 1.0, 2.0]);
    }
}
