// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions for chart-generated marks.
//!
//! Marks carry an explicit `z_index`; renderers sort by `(z_index, MarkId)`. The values are
//! coarse on purpose so callers can slot their own marks in between.

/// Plot background/frame fills.
pub const PLOT_BACKGROUND: i32 = -100;

/// Filled series marks (stream layers, bars).
pub const SERIES_FILL: i32 = 0;
/// Stroked series marks (outlines, rules).
pub const SERIES_STROKE: i32 = 10;

/// Axis domain path and tick marks.
pub const AXIS_RULES: i32 = 30;
/// Axis tick labels.
pub const AXIS_LABELS: i32 = 40;

/// Legend swatches.
pub const LEGEND_SWATCHES: i32 = 60;
/// Legend labels.
pub const LEGEND_LABELS: i32 = 70;
/// Chart-level captions and annotations.
pub const TITLES: i32 = 80;

/// Tooltip panel background and border.
pub const TOOLTIP_PANEL: i32 = 100;
/// Bars inside the tooltip mini chart.
pub const TOOLTIP_SERIES: i32 = 110;
/// Tooltip header, mini axes and their labels.
pub const TOOLTIP_GUIDES: i32 = 120;
