// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart building blocks for `strata_core`, and a streamgraph built from them.
//!
//! This crate is a small layer above `strata_core` and `strata_transforms`:
//! - **Scales** map data values into scene coordinates (linear, time, band).
//! - **Guides** (axes, legends, captions) are built by generating `strata_core::Mark`s.
//! - **Mark specs** turn table rows or value lists into rect, path and text marks.
//! - [`StreamgraphSpec`] stacks wide time-series data with the wiggle offset and draws
//!   smooth layers; [`StreamgraphInteraction`] turns pointer events into hover frames with
//!   a mini bar chart tooltip.
//!
//! Every generator returns plain marks with stable ids. Feed a frame's marks to
//! `strata_core::Scene::tick` to get the minimal set of diffs for a renderer.
//!
//! Text shaping and layout are out of scope; text marks store unshaped strings and
//! measurement goes through [`TextMeasurer`].

#![no_std]

extern crate alloc;

mod axis;
mod bar_mark;
mod curve;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod interaction;
mod layout;
mod legend;
mod measure;
mod rect_mark;
mod rule_mark;
mod scale;
mod stacked_area_mark;
mod streamgraph;
#[cfg(test)]
mod streamgraph_tests;
mod text_mark;
mod time;
mod tooltip;
mod z_order;

pub use axis::{AxisOrient, AxisSpec, AxisStyle, DEFAULT_TIME_PATTERN, StrokeStyle};
pub use bar_mark::BarMarkSpec;
pub use curve::Curve;
pub use format::format_tick_with_step;
pub use interaction::{HoverState, InteractionChange, PointerEvent, StreamgraphInteraction};
pub use layout::{ChartLayout, Margins, Size};
pub use legend::{LegendItem, LegendSwatches, LegendSwatchesSpec};
pub use measure::{HeuristicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};
pub use rect_mark::RectMarkSpec;
pub use rule_mark::RuleMarkSpec;
pub use scale::{
    ScaleBand, ScaleBandSpec, ScaleContinuous, ScaleLinear, ScaleLinearSpec, ScaleSpec,
    ScaleTime, ScaleTimeSpec, infer_domain_f64,
};
pub use stacked_area_mark::StackedAreaMarkSpec;
pub use streamgraph::{
    AXIS_ID_BASE, CAPTION_ID, COL_ROW, COL_SERIES, COL_VALUE, COL_X, COL_Y0, COL_Y1,
    DATA_TABLE, LAYER_ID_BASE, LEGEND_ID_BASE, MAX_SERIES, SERIES_TABLE_BASE, STACKED_TABLE, SeriesSpec,
    StreamData, StreamLayer, StreamRow, StreamgraphChart, StreamgraphSpec,
};
pub use text_mark::TextMarkSpec;
pub use time::{date_to_ms, format_month, month_ticks};
pub use tooltip::{TooltipRequest, TooltipSpec};
pub use z_order::*;
