// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fs::File;
use std::io::Read;
use std::path::Path;

use strata_charts::StreamData;

use crate::error::DataError;
use crate::row::{FromRows, RawRow};

/// Reads headed CSV into rows.
///
/// Records may be shorter or longer than the header. Cells past the header are ignored,
/// and missing cells are absent from the row.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRow>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut rows: Vec<RawRow> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(headers.iter().zip(record.iter()).collect());
    }
    Ok(rows)
}

/// Reads headed CSV from a file.
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Vec<RawRow>, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

/// Reads a CSV file into [`StreamData`] for the given series keys.
pub fn load(path: impl AsRef<Path>, keys: &[String]) -> Result<StreamData, DataError> {
    let path = path.as_ref();
    let rows = read_csv_path(path)?;
    log::debug!("{}: {} records", path.display(), rows.len());
    Ok(StreamData::from_rows(&rows, keys))
}
