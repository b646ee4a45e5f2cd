// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading input data.
#[derive(Error, Debug)]
pub enum DataError {
    /// The input could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV was malformed or could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
