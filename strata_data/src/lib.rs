// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSV ingestion for [`strata_charts::StreamData`].
//!
//! Cells are read leniently, the way a browser-side loader would read them:
//! - dates are tried against a short list of formats and rows that match none are dropped;
//! - numeric cells follow JavaScript unary-plus coercion, with anything that is not a
//!   number reading as 0.
//!
//! ```no_run
//! use strata_data::load;
//!
//! let data = load("usage.csv", &["GPT-4".to_string(), "Gemini".to_string()])?;
//! assert!(data.rows.windows(2).all(|w| w[0].time_ms <= w[1].time_ms));
//! # Ok::<(), strata_data::DataError>(())
//! ```

mod error;
mod parse;
mod reader;
mod row;

pub use error::DataError;
pub use parse::{DATE_FORMATS, coerce_number, parse_date};
pub use reader::{load, read_csv, read_csv_path};
pub use row::{FromRows, RawRow};
