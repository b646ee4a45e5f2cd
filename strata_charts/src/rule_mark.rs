// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Straight stroked segments: axis ticks and other guide lines.

use kurbo::{BezPath, Line, Point};
use peniko::Color;
use strata_core::{Mark, MarkId};

use crate::axis::StrokeStyle;
use crate::z_order;

/// A single stroked segment.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Segment in scene coordinates.
    pub line: Line,
    /// Stroke paint and width.
    pub stroke: StrokeStyle,
    /// Rendering order hint.
    pub z_index: i32,
}

impl RuleMarkSpec {
    /// A 1px black rule from `p0` to `p1`.
    pub fn new(id: MarkId, p0: Point, p1: Point) -> Self {
        Self {
            id,
            line: Line::new(p0, p1),
            stroke: StrokeStyle::default(),
            z_index: z_order::SERIES_STROKE,
        }
    }

    /// Sets the stroke.
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = stroke;
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// An open two-point path with a transparent fill.
    pub fn mark(&self) -> Mark {
        let mut path = BezPath::new();
        path.move_to(self.line.p0);
        path.line_to(self.line.p1);
        Mark::builder(self.id)
            .path()
            .shape(path)
            .z_index(self.z_index)
            .fill(Color::TRANSPARENT)
            .stroke(self.stroke.brush.clone(), self.stroke.stroke_width)
            .build()
    }
}
