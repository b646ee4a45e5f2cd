// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked area mark generation (using `y0`/`y1` columns).

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{BezPath, Point};
use peniko::Brush;
use strata_core::{ColId, Mark, MarkId, Scene, Table, TableId};

use crate::curve::Curve;
use crate::scale::ScaleContinuous;

/// A stacked area mark derived from a table.
///
/// This expects the table rows sorted by `x` for the series being rendered. It uses `y0`/`y1`
/// columns to define the bottom and top of the filled area (typically output from
/// `strata_transforms::Transform::Stack`).
///
/// The outline runs along `y1` from left to right, joins the `y0` edge with a straight
/// line, runs back along `y0` and closes, with both edges interpolated by `curve`.
#[derive(Clone, Debug)]
pub struct StackedAreaMarkSpec {
    /// Stable id of the area mark.
    pub id: MarkId,
    /// Source table id.
    pub table: TableId,
    /// Column for x values.
    pub x: ColId,
    /// Column for bottom values.
    pub y0: ColId,
    /// Column for top values.
    pub y1: ColId,
    /// X scale mapping data x into scene x.
    pub x_scale: ScaleContinuous,
    /// Y scale mapping data y into scene y.
    pub y_scale: ScaleContinuous,
    /// Edge interpolation.
    pub curve: Curve,
    /// Fill paint for the area.
    pub fill: Brush,
    /// Group opacity.
    pub opacity: f64,
    /// Rendering order hint (`strata_core::Mark::z_index`).
    pub z_index: i32,
}

impl StackedAreaMarkSpec {
    /// Creates a stacked area mark with default fill (`Brush::default()`) and a Catmull-Rom
    /// curve.
    pub fn new(
        id: MarkId,
        table: TableId,
        (x, y0, y1): (ColId, ColId, ColId),
        x_scale: impl Into<ScaleContinuous>,
        y_scale: impl Into<ScaleContinuous>,
    ) -> Self {
        Self {
            id,
            table,
            x,
            y0,
            y1,
            x_scale: x_scale.into(),
            y_scale: y_scale.into(),
            curve: Curve::default(),
            fill: Brush::default(),
            opacity: 1.0,
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Sets the edge interpolation.
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the group opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Builds the area outline from `table`.
    ///
    /// Rows with a non-finite `x`, `y0` or `y1` are skipped. An empty table gives an empty
    /// path.
    pub fn path(&self, table: &Table) -> BezPath {
        let n = table.row_count();
        let mut top: Vec<Point> = Vec::with_capacity(n);
        let mut bot: Vec<Point> = Vec::with_capacity(n);
        for row in 0..n {
            let (Some(x), Some(y0), Some(y1)) = (
                table.f64(row, self.x),
                table.f64(row, self.y0),
                table.f64(row, self.y1),
            ) else {
                continue;
            };
            if !(x.is_finite() && y0.is_finite() && y1.is_finite()) {
                continue;
            }
            let sx = self.x_scale.map(x);
            top.push(Point::new(sx, self.y_scale.map(y1)));
            bot.push(Point::new(sx, self.y_scale.map(y0)));
        }

        let mut p = BezPath::new();
        if top.is_empty() {
            return p;
        }
        bot.reverse();
        self.curve.append(&mut p, &top, false);
        self.curve.append(&mut p, &bot, true);
        p.close_path();
        p
    }

    /// Builds the area outline from the scene table named by [`Self::table`].
    ///
    /// Returns `None` if the scene has no such table.
    pub fn path_in(&self, scene: &Scene) -> Option<BezPath> {
        scene.tables.get(&self.table).map(|t| self.path(t))
    }

    /// Wraps an already built outline in a path mark with this spec's paint.
    pub fn mark_with_path(&self, path: BezPath) -> Mark {
        Mark::builder(self.id)
            .path()
            .z_index(self.z_index)
            .shape(path)
            .fill(self.fill.clone())
            .opacity(self.opacity)
            .build()
    }

    /// Generates the area mark from `table`.
    pub fn mark(&self, table: &Table) -> Mark {
        self.mark_with_path(self.path(table))
    }
}
