// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tick mark changes.

extern crate alloc;

use alloc::boxed::Box;

use kurbo::Rect;

use crate::ids::MarkId;
use crate::mark::{MarkKind, MarkPayload};

/// A change to the retained mark set, as reported by [`crate::Scene::tick`].
#[derive(Clone, Debug, PartialEq)]
pub enum MarkDiff {
    /// A mark appeared.
    Enter {
        /// Mark identity.
        id: MarkId,
        /// Mark kind.
        kind: MarkKind,
        /// Paint order.
        z_index: i32,
        /// Geometry bounds, when known.
        bounds: Option<Rect>,
        /// The new payload.
        new: Box<MarkPayload>,
    },
    /// A mark changed its payload or paint order.
    Update {
        /// Mark identity.
        id: MarkId,
        /// Mark kind (after the update).
        kind: MarkKind,
        /// Previous paint order.
        old_z_index: i32,
        /// New paint order.
        new_z_index: i32,
        /// Previous bounds.
        old_bounds: Option<Rect>,
        /// New bounds.
        new_bounds: Option<Rect>,
        /// Previous payload.
        old: Box<MarkPayload>,
        /// New payload.
        new: Box<MarkPayload>,
    },
    /// A mark disappeared.
    Exit {
        /// Mark identity.
        id: MarkId,
        /// Mark kind.
        kind: MarkKind,
        /// Last known bounds.
        bounds: Option<Rect>,
        /// Last payload.
        old: Box<MarkPayload>,
    },
}

impl MarkDiff {
    /// The id of the mark this diff refers to.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }

    /// The region a renderer has to repaint for this diff.
    pub fn damage(&self) -> Option<Rect> {
        match self {
            Self::Enter { bounds, .. } | Self::Exit { bounds, .. } => *bounds,
            Self::Update {
                old_bounds,
                new_bounds,
                ..
            } => match (old_bounds, new_bounds) {
                (Some(a), Some(b)) => Some(a.union(*b)),
                (a, b) => a.or(*b),
            },
        }
    }
}
