// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained scene graph for Strata.
//!
//! The core is deliberately small:
//! - **Tables** hold numeric input data behind the [`TableData`] accessor.
//! - **Marks** are stable-identity drawing primitives (rects, paths, text).
//! - A [`Scene`] retains the last mark set and reports [`MarkDiff`]s on every
//!   [`Scene::tick`], so renderers only touch what changed.
//!
//! Chart construction (scales, axes, layouts) lives in `strata_charts`; this crate knows
//! nothing about data semantics beyond "numbers in columns".

#![no_std]

extern crate alloc;

mod diff;
mod ids;
mod mark;
mod scene;
mod table;

pub use diff::MarkDiff;
pub use ids::{ColId, MarkId, TableId};
pub use mark::{
    Mark, MarkBuilder, MarkKind, MarkPayload, PathPayload, RectPayload, TextAnchor,
    TextBaseline, TextPayload,
};
pub use scene::Scene;
pub use table::{Table, TableData};
