// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover tooltip with a per-series mini bar chart.
//!
//! The tooltip is a bordered panel holding a bold header (the series key) above a small
//! chart: one bar per data row over a band scale of `"%b %y"` labels, with a sparse bottom
//! axis and a four-tick left axis.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};
use peniko::{Brush, Color};
use strata_core::{Mark, MarkId, MarkPayload, TextAnchor, TextBaseline};

use crate::axis::{AxisSpec, StrokeStyle};
use crate::bar_mark::BarMarkSpec;
use crate::layout::{Margins, Size};
use crate::rect_mark::RectMarkSpec;
use crate::scale::{ScaleBandSpec, ScaleLinearSpec};
use crate::text_mark::TextMarkSpec;
use crate::time::format_month;
use crate::z_order;

/// Which series the tooltip shows, where, and whether it is visible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipRequest {
    /// Series (layer) index.
    pub series: usize,
    /// Pointer position in view coordinates.
    pub anchor: Point,
    /// Hidden tooltips keep their marks at zero opacity.
    pub visible: bool,
}

/// Appearance and layout of the hover tooltip.
#[derive(Clone, Debug)]
pub struct TooltipSpec {
    /// Stable-id base for every tooltip mark.
    pub id_base: u64,
    /// Size of the mini chart (margins included).
    pub chart_size: Size,
    /// Mini chart margins around its plot area.
    pub chart_margins: Margins,
    /// Panel padding around the header and chart.
    pub padding: f64,
    /// Panel corner radius.
    pub corner_radius: f64,
    /// Panel background.
    pub background: Brush,
    /// Panel border.
    pub border: StrokeStyle,
    /// Header font size.
    pub header_font_size: f64,
    /// Space between the header and the chart.
    pub header_gap: f64,
    /// Offset from the pointer to the panel's top-left corner.
    pub offset: Vec2,
    /// Band padding (inner and outer) of the bar scale.
    pub band_padding: f64,
    /// chrono pattern for bar labels.
    pub date_pattern: String,
    /// Approximate tick count of the value axis.
    pub value_ticks: usize,
    /// Axis label font size.
    pub label_font_size: f64,
    /// Rotation of the date labels, in degrees.
    pub label_angle: f64,
}

impl TooltipSpec {
    /// Default stable-id base for tooltip marks.
    pub const DEFAULT_ID_BASE: u64 = 40_000;
    /// Ids used by one tooltip: `id_base..id_base + ID_SPAN`.
    pub const ID_SPAN: u64 = Self::BARS_BASE + Self::MAX_BARS as u64;
    /// Rows past this count are left out of the bar chart.
    pub const MAX_BARS: usize = 10_000;

    const HEADER_ID: u64 = 1;
    const X_AXIS_BASE: u64 = 100;
    const Y_AXIS_BASE: u64 = 3_000;
    const BARS_BASE: u64 = 10_000;

    /// Creates the default tooltip: a 220x160 chart in an 8px padded white panel, shown
    /// 15px right of and 10px above the pointer.
    pub fn new() -> Self {
        Self {
            id_base: Self::DEFAULT_ID_BASE,
            chart_size: Size::new(220.0, 160.0),
            chart_margins: Margins::new(20.0, 10.0, 40.0, 40.0),
            padding: 8.0,
            corner_radius: 4.0,
            background: Brush::Solid(Color::WHITE),
            border: StrokeStyle::solid(Color::from_rgb8(0xcc, 0xcc, 0xcc), 1.0),
            header_font_size: 16.0,
            header_gap: 4.0,
            offset: Vec2::new(15.0, -10.0),
            band_padding: 0.1,
            date_pattern: String::from("%b %y"),
            value_ticks: 4,
            label_font_size: 9.0,
            label_angle: -40.0,
        }
    }

    /// Sets the stable-id base.
    pub fn with_id_base(mut self, id_base: u64) -> Self {
        self.id_base = id_base;
        self
    }

    /// Sets the mini chart size.
    pub fn with_chart_size(mut self, size: Size) -> Self {
        self.chart_size = size;
        self
    }

    /// Sets the pointer offset.
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the bar label date pattern.
    pub fn with_date_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.date_pattern = pattern.into();
        self
    }

    fn header_height(&self) -> f64 {
        self.header_font_size * 1.2
    }

    /// The panel rectangle for a pointer at `anchor`.
    pub fn panel_rect(&self, anchor: Point) -> Rect {
        let origin = anchor + self.offset;
        let w = self.chart_size.width + self.padding * 2.0;
        let h = self.padding * 2.0
            + self.header_height()
            + self.header_gap
            + self.chart_size.height;
        Rect::from_origin_size(origin, (w, h))
    }

    /// The mini chart's plot rectangle for a pointer at `anchor`.
    pub fn plot_rect(&self, anchor: Point) -> Rect {
        let panel = self.panel_rect(anchor);
        let chart = Point::new(
            panel.x0 + self.padding,
            panel.y0 + self.padding + self.header_height() + self.header_gap,
        );
        let m = self.chart_margins;
        Rect::new(
            chart.x + m.left,
            chart.y + m.top,
            chart.x + (self.chart_size.width - m.right).max(m.left),
            chart.y + (self.chart_size.height - m.bottom).max(m.top),
        )
    }

    /// Generates the tooltip marks for one series.
    ///
    /// `dates` (epoch ms) and `values` are paired by position; a missing value counts as 0.
    /// Mark ids do not depend on the series, so switching series updates marks in place.
    pub fn marks(
        &self,
        series_index: usize,
        key: &str,
        fill: Color,
        dates: &[f64],
        values: &[f64],
        anchor: Point,
    ) -> Vec<Mark> {
        log::trace!(
            "tooltip for series {series_index} ({key}): {} bars at ({:.1}, {:.1})",
            dates.len(),
            anchor.x,
            anchor.y
        );
        let dates = if dates.len() > Self::MAX_BARS {
            log::warn!(
                "tooltip for {key}: dropping {} of {} bars",
                dates.len() - Self::MAX_BARS,
                dates.len()
            );
            &dates[..Self::MAX_BARS]
        } else {
            dates
        };
        let panel = self.panel_rect(anchor);
        let plot = self.plot_rect(anchor);
        let mut out = Vec::new();

        out.push(
            RectMarkSpec::new(MarkId::from_raw(self.id_base), panel)
                .with_fill(self.background.clone())
                .with_stroke(self.border.clone())
                .with_corner_radius(self.corner_radius)
                .with_z_index(z_order::TOOLTIP_PANEL)
                .mark(),
        );
        out.push(
            TextMarkSpec::new(
                MarkId::from_raw(self.id_base + Self::HEADER_ID),
                Point::new(panel.x0 + self.padding, panel.y0 + self.padding),
                key,
            )
            .with_font_size(self.header_font_size)
            .with_font_weight(700)
            .with_baseline(TextBaseline::Hanging)
            .with_z_index(z_order::TOOLTIP_GUIDES)
            .mark(),
        );

        let labels: Vec<String> = dates
            .iter()
            .map(|&d| format_month(d, &self.date_pattern))
            .collect();
        let values: Vec<f64> = (0..labels.len())
            .map(|i| values.get(i).copied().unwrap_or(0.0))
            .collect();

        let band_spec = ScaleBandSpec::new(labels.iter().cloned()).with_padding(self.band_padding);
        let band = band_spec.instantiate((plot.x0, plot.x1));

        let max = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
            .unwrap_or(0.0);
        let y_spec = ScaleLinearSpec::new((0.0, max)).with_nice(true);
        let y = y_spec.instantiate_resolved((plot.y1, plot.y0));

        out.extend(
            BarMarkSpec::new(self.id_base + Self::BARS_BASE, band.clone(), y)
                .with_floor(plot.y1)
                .with_fill(fill)
                .with_z_index(z_order::TOOLTIP_SERIES)
                .marks(labels.iter().map(String::as_str).zip(values.iter().copied())),
        );

        let step = (labels.len() / 4).max(1);
        let ticks = (0..band.count())
            .filter(|i| i % step == 0)
            .map(|i| i as f64);
        out.extend(
            AxisSpec::bottom(self.id_base + Self::X_AXIS_BASE, band_spec)
                .with_tick_values(ticks)
                .with_label_font_size(self.label_font_size)
                .with_label_angle(self.label_angle)
                .with_label_anchor(TextAnchor::End)
                .with_z_index(z_order::TOOLTIP_GUIDES, z_order::TOOLTIP_GUIDES)
                .marks(plot),
        );
        out.extend(
            AxisSpec::left(self.id_base + Self::Y_AXIS_BASE, y_spec)
                .with_tick_count(self.value_ticks)
                .with_tick_size_outer(0.0)
                .with_label_font_size(self.label_font_size)
                .with_z_index(z_order::TOOLTIP_GUIDES, z_order::TOOLTIP_GUIDES)
                .marks(plot),
        );

        out
    }

    /// Generates tooltip marks for `request`, fading them out when it is hidden.
    pub fn marks_for(
        &self,
        request: &TooltipRequest,
        key: &str,
        fill: Color,
        dates: &[f64],
        values: &[f64],
    ) -> Vec<Mark> {
        let mut marks = self.marks(request.series, key, fill, dates, values, request.anchor);
        if !request.visible {
            for mark in &mut marks {
                fade(mark, 0.0);
            }
        }
        marks
    }
}

impl Default for TooltipSpec {
    fn default() -> Self {
        Self::new()
    }
}

/// Multiplies a mark's group opacity by `factor`.
fn fade(mark: &mut Mark, factor: f64) {
    let opacity = match &mut mark.payload {
        MarkPayload::Rect(r) => &mut r.opacity,
        MarkPayload::Path(p) => &mut p.opacity,
        MarkPayload::Text(t) => &mut t.opacity,
    };
    *opacity = (*opacity * factor).clamp(0.0, 1.0);
}
