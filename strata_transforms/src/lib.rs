// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table transforms for Strata.
//!
//! This crate provides:
//! - a small transform IR of `TableId -> TableId` operators ([`Transform`]),
//! - a full-recompute executor ([`Program`]) over owned numeric [`TableFrame`]s, and
//! - pure stacking helpers ([`stack_series`], [`stack_column`]) implementing the
//!   [`StackOffset`] modes, including the streamgraph "wiggle" baseline.
//!
//! Upstream `row_keys` are preserved through every transform, so per-row marks keep their
//! identity across recomputes.

#![no_std]

extern crate alloc;

mod program;
mod scene;
mod stack;
mod table;
mod transform;

pub use program::{ExecutionError, Program, ProgramOutput};
pub use scene::SceneExecutionError;
pub use stack::{stack_column, stack_series};
pub use table::{TableFrame, TableFrameError};
pub use transform::{CompareOp, Predicate, SortOrder, StackOffset, Transform};
