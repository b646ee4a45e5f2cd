// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar mark generation.

extern crate alloc;

use alloc::vec::Vec;

use peniko::Brush;
use strata_core::{Mark, MarkId};

use crate::scale::{ScaleBand, ScaleContinuous};

/// Vertical bars positioned by a band scale.
///
/// This generates one [`strata_core::MarkKind::Rect`] mark per `(label, value)` pair, with
/// bar geometry derived from the value and a baseline. Bars whose label is not in the band
/// domain are skipped.
#[derive(Clone, Debug)]
pub struct BarMarkSpec {
    /// Stable-id base; bar `i` gets `id_base + i`.
    pub id_base: u64,
    /// Band scale used for bar positions along x.
    pub band: ScaleBand,
    /// Linear scale used for bar positions along y.
    pub y_scale: ScaleContinuous,
    /// Baseline in data units (typically `0.0`).
    pub baseline: f64,
    /// Bar bottom in range units. Overrides `baseline` when set.
    pub floor: Option<f64>,
    /// Fill paint for bars.
    pub fill: Brush,
    /// Group opacity applied to every bar.
    pub opacity: f64,
    /// Rendering order hint (`strata_core::Mark::z_index`).
    pub z_index: i32,
}

impl BarMarkSpec {
    /// Creates a bar mark spec with `baseline = 0` and a default fill (`Brush::default()`).
    pub fn new(id_base: u64, band: ScaleBand, y_scale: impl Into<ScaleContinuous>) -> Self {
        Self {
            id_base,
            band,
            y_scale: y_scale.into(),
            baseline: 0.0,
            floor: None,
            fill: Brush::default(),
            opacity: 1.0,
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Sets the baseline in data units.
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    /// Anchors every bar at `floor` in range units instead of at the mapped baseline.
    ///
    /// With a degenerate value domain the baseline maps to the middle of the range, so
    /// a floor keeps bars standing on the plot edge.
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
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

    /// Generates one bar per `(label, value)`.
    ///
    /// Non-finite values draw at the baseline. Ids follow the input position, so repeated
    /// labels still get distinct marks.
    pub fn marks<'a>(&self, bars: impl IntoIterator<Item = (&'a str, f64)>) -> Vec<Mark> {
        let bw = self.band.band_width();
        let y0 = self
            .floor
            .unwrap_or_else(|| self.y_scale.map(self.baseline));

        bars.into_iter()
            .enumerate()
            .filter_map(|(i, (label, value))| {
                let x = self.band.x(label)?;
                let v = if value.is_finite() { value } else { self.baseline };
                let y = self.y_scale.map(v);
                Some(
                    Mark::builder(MarkId::from_raw(self.id_base + i as u64))
                        .rect()
                        .z_index(self.z_index)
                        .x(x)
                        .y(y.min(y0))
                        .w(bw)
                        .h((y - y0).abs())
                        .fill(self.fill.clone())
                        .opacity(self.opacity)
                        .build(),
                )
            })
            .collect()
    }
}
