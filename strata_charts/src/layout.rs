// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Margin-based chart layout.
//!
//! A chart reserves fixed margins around its plot. The legend hangs off the right edge
//! of the plot and the caption sits centered under it, just above the bottom of the view.

use kurbo::{Point, Rect};

/// A width/height pair used by chart layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in chart coordinate units.
    pub width: f64,
    /// Height in chart coordinate units.
    pub height: f64,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Space reserved around the plot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    /// Space above the plot.
    pub top: f64,
    /// Space right of the plot.
    pub right: f64,
    /// Space below the plot.
    pub bottom: f64,
    /// Space left of the plot.
    pub left: f64,
}

impl Margins {
    /// Creates margins in CSS order (top, right, bottom, left).
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// The arranged regions of a chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// The full view rectangle, anchored at the origin.
    pub view: Rect,
    /// The plot (data) rectangle.
    pub plot: Rect,
    /// Top-left corner of the legend.
    pub legend_origin: Point,
    /// Anchor for the centered caption under the plot.
    pub caption_anchor: Point,
}

impl ChartLayout {
    /// Gap between the plot's right edge and the legend.
    pub const DEFAULT_LEGEND_GAP: f64 = 15.0;
    /// Distance from the bottom of the view to the caption baseline.
    pub const CAPTION_INSET: f64 = 5.0;

    /// Arranges a chart with the default legend gap.
    pub fn arrange(view_size: Size, margins: Margins) -> Self {
        Self::arrange_with_gap(view_size, margins, Self::DEFAULT_LEGEND_GAP)
    }

    /// Arranges a chart with an explicit legend gap.
    ///
    /// Margins larger than the view collapse the plot to zero size rather than inverting it.
    pub fn arrange_with_gap(view_size: Size, margins: Margins, legend_gap: f64) -> Self {
        let view = Rect::new(0.0, 0.0, view_size.width, view_size.height);
        let x0 = margins.left;
        let y0 = margins.top;
        let plot = Rect::new(
            x0,
            y0,
            (view.x1 - margins.right).max(x0),
            (view.y1 - margins.bottom).max(y0),
        );
        Self {
            view,
            plot,
            legend_origin: Point::new(plot.x1 + legend_gap, plot.y0),
            caption_anchor: Point::new(plot.x0 + plot.width() * 0.5, view.y1 - Self::CAPTION_INSET),
        }
    }
}
