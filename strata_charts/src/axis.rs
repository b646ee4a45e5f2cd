// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mark generation.
//!
//! An [`AxisSpec`] pairs a scale with an orientation. It can be measured (for layout) and
//! then turned into marks for a plot rectangle. Geometry follows d3-axis: a domain path
//! with outer ticks at both ends, inner ticks at each tick value, and labels offset by
//! `max(tick_size_inner, 0) + tick_padding`.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::{Brush, Color};
use strata_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::format::format_tick_with_step;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{ScaleBand, ScaleContinuous, ScaleSpec};
use crate::text_mark::TextMarkSpec;
use crate::time::format_month;
use crate::z_order;
use crate::{TextMeasurer, TextStyle};

/// Label pattern for time axes without a custom formatter.
pub const DEFAULT_TIME_PATTERN: &str = "%b";

/// A paint + width pair for stroked paths (domain lines, ticks, outlines).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(Color::BLACK, 1.0)
    }
}

/// Axis styling.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Style for the axis domain path and tick marks.
    pub rule: StrokeStyle,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Font size for tick labels.
    pub label_font_size: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        let rule = StrokeStyle::default();
        Self {
            label_fill: rule.brush.clone(),
            rule,
            label_font_size: 10.0,
        }
    }
}

/// Axis placement relative to the plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis along the bottom edge of the plot.
    Bottom,
    /// A vertical axis along the left edge of the plot.
    Left,
}

/// An axis specification.
#[derive(Clone)]
pub struct AxisSpec {
    /// Stable-id base; each generated mark uses a deterministic offset from this base.
    pub id_base: u64,
    /// The axis scale specification.
    pub scale: ScaleSpec,
    /// Axis placement relative to the plot.
    pub orient: AxisOrient,
    /// Approximate number of ticks for linear scales.
    pub tick_count: usize,
    /// Explicit tick values, overriding generated ticks.
    ///
    /// For band scales these are band indices.
    pub tick_values: Option<Vec<f64>>,
    /// Length of the tick at each value.
    pub tick_size_inner: f64,
    /// Length of the ticks at both ends of the domain path.
    pub tick_size_outer: f64,
    /// Gap between the tick end and its label.
    pub tick_padding: f64,
    /// Whether to draw the domain path.
    pub show_domain: bool,
    /// Axis styling.
    pub style: AxisStyle,
    /// Optional tick label formatter, called with `(value, step)`.
    pub tick_formatter: Option<Arc<dyn Fn(f64, f64) -> String>>,
    /// Tick label rotation in degrees, about the tick origin.
    pub label_angle: f64,
    /// Overrides the orientation's default label anchor.
    pub label_anchor: Option<TextAnchor>,
    /// Z-index for the domain path and ticks.
    pub rule_z_index: i32,
    /// Z-index for the tick labels.
    pub label_z_index: i32,
}

impl core::fmt::Debug for AxisSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisSpec")
            .field("id_base", &self.id_base)
            .field("scale", &self.scale)
            .field("orient", &self.orient)
            .field("tick_count", &self.tick_count)
            .field("tick_values", &self.tick_values)
            .field("tick_size_inner", &self.tick_size_inner)
            .field("tick_size_outer", &self.tick_size_outer)
            .field("tick_padding", &self.tick_padding)
            .field("show_domain", &self.show_domain)
            .field("style", &self.style)
            .field("tick_formatter", &self.tick_formatter.is_some())
            .field("label_angle", &self.label_angle)
            .field("label_anchor", &self.label_anchor)
            .field("rule_z_index", &self.rule_z_index)
            .field("label_z_index", &self.label_z_index)
            .finish()
    }
}

/// A scale resolved against the axis range.
enum Resolved {
    Continuous(ScaleContinuous),
    Band(ScaleBand),
}

impl AxisSpec {
    /// Ids used by one axis: `id_base..id_base + ID_SPAN`.
    ///
    /// The domain path is `id_base`, tick `i` is `id_base + 1 + i` and its label is
    /// `id_base + LABEL_ID_OFFSET + i`.
    pub const ID_SPAN: u64 = 2 * Self::LABEL_ID_OFFSET;
    /// Ticks past this count are dropped so tick and label ids stay in their blocks.
    pub const MAX_TICKS: usize = 999;

    const LABEL_ID_OFFSET: u64 = 1_000;

    /// Creates a new axis specification.
    ///
    /// Defaults: 10 ticks, inner and outer tick size 6, tick padding 3, 10px labels.
    pub fn new(id_base: u64, scale: impl Into<ScaleSpec>, orient: AxisOrient) -> Self {
        Self {
            id_base,
            scale: scale.into(),
            orient,
            tick_count: 10,
            tick_values: None,
            tick_size_inner: 6.0,
            tick_size_outer: 6.0,
            tick_padding: 3.0,
            show_domain: true,
            style: AxisStyle::default(),
            tick_formatter: None,
            label_angle: 0.0,
            label_anchor: None,
            rule_z_index: z_order::AXIS_RULES,
            label_z_index: z_order::AXIS_LABELS,
        }
    }

    /// Convenience constructor for a `bottom` axis.
    pub fn bottom(id_base: u64, scale: impl Into<ScaleSpec>) -> Self {
        Self::new(id_base, scale, AxisOrient::Bottom)
    }

    /// Convenience constructor for a `left` axis.
    pub fn left(id_base: u64, scale: impl Into<ScaleSpec>) -> Self {
        Self::new(id_base, scale, AxisOrient::Left)
    }

    /// Set the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Set explicit tick values.
    pub fn with_tick_values(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.tick_values = Some(values.into_iter().collect());
        self
    }

    /// Set both inner and outer tick sizes.
    pub fn with_tick_size(mut self, size: f64) -> Self {
        self.tick_size_inner = size;
        self.tick_size_outer = size;
        self
    }

    /// Set the inner tick size.
    pub fn with_tick_size_inner(mut self, size: f64) -> Self {
        self.tick_size_inner = size;
        self
    }

    /// Set the outer tick size.
    pub fn with_tick_size_outer(mut self, size: f64) -> Self {
        self.tick_size_outer = size;
        self
    }

    /// Set tick padding in scene coordinates.
    pub fn with_tick_padding(mut self, tick_padding: f64) -> Self {
        self.tick_padding = tick_padding;
        self
    }

    /// Enable or disable the domain path.
    pub fn with_domain(mut self, domain: bool) -> Self {
        self.show_domain = domain;
        self
    }

    /// Set the axis style.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the tick label font size.
    pub fn with_label_font_size(mut self, size: f64) -> Self {
        self.style.label_font_size = size;
        self
    }

    /// Set a custom tick label formatter.
    pub fn with_tick_formatter(mut self, f: impl Fn(f64, f64) -> String + 'static) -> Self {
        self.tick_formatter = Some(Arc::new(f));
        self
    }

    /// Set tick label rotation angle in degrees.
    pub fn with_label_angle(mut self, angle_degrees: f64) -> Self {
        self.label_angle = angle_degrees;
        self
    }

    /// Override the label anchor.
    pub fn with_label_anchor(mut self, anchor: TextAnchor) -> Self {
        self.label_anchor = Some(anchor);
        self
    }

    /// Set the z-indexes for rules and labels.
    pub fn with_z_index(mut self, rules: i32, labels: i32) -> Self {
        self.rule_z_index = rules;
        self.label_z_index = labels;
        self
    }

    fn resolve(&self, range: (f64, f64)) -> Resolved {
        match &self.scale {
            ScaleSpec::Linear(s) => Resolved::Continuous(s.instantiate_resolved(range).into()),
            ScaleSpec::Time(s) => Resolved::Continuous(s.instantiate(range).into()),
            ScaleSpec::Band(s) => Resolved::Band(s.instantiate(range)),
        }
    }

    /// Tick values and the step used for formatting.
    fn tick_values(&self) -> (Vec<f64>, f64) {
        let generated = || match &self.scale {
            ScaleSpec::Linear(s) => {
                let scale = s.instantiate_resolved((0.0, 1.0));
                (scale.ticks(self.tick_count), scale.tick_step(self.tick_count))
            }
            ScaleSpec::Time(s) => (s.instantiate((0.0, 1.0)).ticks(), 0.0),
            ScaleSpec::Band(s) => ((0..s.labels.len()).map(|i| i as f64).collect(), 1.0),
        };
        match &self.tick_values {
            Some(values) => (values.clone(), tick_step(values)),
            None => generated(),
        }
    }

    fn format_tick(&self, v: f64, step: f64) -> String {
        if let Some(f) = &self.tick_formatter {
            return (f)(v, step);
        }
        match &self.scale {
            ScaleSpec::Linear(_) => format_tick_with_step(v, step),
            ScaleSpec::Time(_) => format_month(v, DEFAULT_TIME_PATTERN),
            ScaleSpec::Band(s) => s
                .labels
                .get(discrete_index(v))
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Measure the thickness this axis needs along its normal direction.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> f64 {
        let (mut ticks, step) = self.tick_values();
        if ticks.len() > Self::MAX_TICKS {
            log::warn!(
                "axis {}: dropping {} of {} ticks",
                self.id_base,
                ticks.len() - Self::MAX_TICKS,
                ticks.len()
            );
            ticks.truncate(Self::MAX_TICKS);
        }
        let theta = self.label_angle.to_radians();
        let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
        let style = TextStyle::new(self.style.label_font_size);

        let mut label_extent = 0.0_f64;
        for v in ticks {
            let metrics = measurer.measure(&self.format_tick(v, step), style);
            let (w, h) = (metrics.advance_width, metrics.line_height());
            let extent = match self.orient {
                AxisOrient::Bottom => sin * w + cos * h,
                AxisOrient::Left => cos * w + sin * h,
            };
            label_extent = label_extent.max(extent);
        }
        self.tick_size_inner.max(0.0) + self.tick_padding.max(0.0) + label_extent
    }

    /// Generate axis marks along the bottom or left edge of `plot`.
    pub fn marks(&self, plot: Rect) -> Vec<Mark> {
        let (origin, range, normal) = match self.orient {
            AxisOrient::Bottom => (
                Point::new(0.0, plot.y1),
                (plot.x0, plot.x1),
                Vec2::new(0.0, 1.0),
            ),
            AxisOrient::Left => (
                Point::new(plot.x0, 0.0),
                (plot.y1, plot.y0),
                Vec2::new(-1.0, 0.0),
            ),
        };
        // Moves `t` along the axis line, then `k` outward.
        let at = |t: f64, k: f64| match self.orient {
            AxisOrient::Bottom => Point::new(t, origin.y) + normal * k,
            AxisOrient::Left => Point::new(origin.x, t) + normal * k,
        };

        let resolved = self.resolve(range);
        let (ticks, step) = self.tick_values();
        let position = |v: f64| match &resolved {
            Resolved::Continuous(s) => s.map(v),
            Resolved::Band(b) => b.x_index(discrete_index(v)) + b.band_width() * 0.5,
        };

        let mut out = Vec::new();

        if self.show_domain {
            let outer = self.tick_size_outer;
            let mut domain = BezPath::new();
            if outer == 0.0 {
                domain.move_to(at(range.0, 0.0));
                domain.line_to(at(range.1, 0.0));
            } else {
                domain.move_to(at(range.0, outer));
                domain.line_to(at(range.0, 0.0));
                domain.line_to(at(range.1, 0.0));
                domain.line_to(at(range.1, outer));
            }
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base))
                    .path()
                    .shape(domain)
                    .z_index(self.rule_z_index)
                    .fill(Color::TRANSPARENT)
                    .stroke(
                        self.style.rule.brush.clone(),
                        self.style.rule.stroke_width,
                    )
                    .build(),
            );
        }

        let (anchor, baseline) = match self.orient {
            AxisOrient::Bottom => (TextAnchor::Middle, TextBaseline::Hanging),
            AxisOrient::Left => (TextAnchor::End, TextBaseline::Middle),
        };
        let anchor = self.label_anchor.unwrap_or(anchor);
        let spacing = self.tick_size_inner.max(0.0) + self.tick_padding;
        let label_offset = rotate(normal * spacing, self.label_angle);

        for (i, v) in ticks.iter().copied().enumerate() {
            let t = position(v);
            if !t.is_finite() {
                continue;
            }
            let tick_start = at(t, 0.0);
            let tick_end = at(t, self.tick_size_inner);
            out.push(
                RuleMarkSpec::new(
                    MarkId::from_raw(self.id_base + 1 + i as u64),
                    tick_start,
                    tick_end,
                )
                .with_stroke(self.style.rule.clone())
                .with_z_index(self.rule_z_index)
                .mark(),
            );
            out.push(
                TextMarkSpec::new(
                    MarkId::from_raw(self.id_base + Self::LABEL_ID_OFFSET + i as u64),
                    tick_start + label_offset,
                    self.format_tick(v, step),
                )
                .with_font_size(self.style.label_font_size)
                .with_fill(self.style.label_fill.clone())
                .with_anchor(anchor)
                .with_baseline(baseline)
                .with_angle(self.label_angle)
                .with_z_index(self.label_z_index)
                .mark(),
            );
        }

        out
    }
}

/// Rotates `v` by `degrees` in scene space (y down, positive is clockwise on screen).
fn rotate(v: Vec2, degrees: f64) -> Vec2 {
    if degrees == 0.0 {
        return v;
    }
    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin(), theta.cos());
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

fn tick_step(ticks: &[f64]) -> f64 {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}

fn discrete_index(v: f64) -> usize {
    if !v.is_finite() || v < 0.0 {
        return 0;
    }
    let v = v.round().min(100_000.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value is clamped to a small non-negative range"
    )]
    {
        v as usize
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::PathEl;
    use strata_core::{MarkKind, MarkPayload, TextPayload};

    use super::*;
    use crate::HeuristicTextMeasurer;
    use crate::scale::{ScaleBandSpec, ScaleLinearSpec, ScaleTimeSpec};

    fn texts(marks: &[Mark]) -> Vec<&TextPayload> {
        marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn measure_accounts_for_label_angle() {
        let measurer = HeuristicTextMeasurer;
        let axis = AxisSpec::bottom(1, ScaleLinearSpec::new((0.0, 1000.0))).with_tick_count(4);
        let flat = axis.measure(&measurer);
        // Tick 6 + padding 3 + one 10px line.
        assert_eq!(flat, 19.0);
        let tilted = axis.with_label_angle(-40.0).measure(&measurer);
        assert!(tilted > flat);
    }

    #[test]
    fn custom_formatter_replaces_labels() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let axis = AxisSpec::bottom(1, ScaleLinearSpec::new((0.0, 10.0)))
            .with_tick_count(3)
            .with_tick_formatter(|_v, _step| String::from("X"));
        let marks = axis.marks(plot);
        let labels = texts(&marks);
        assert!(!labels.is_empty());
        assert!(labels.iter().all(|t| t.text == "X"));
    }

    #[test]
    fn time_axis_labels_months() {
        let jan = 1_672_531_200_000.0;
        let mar = 1_677_628_800_000.0;
        let plot = Rect::new(50.0, 100.0, 420.0, 460.0);
        let marks = AxisSpec::bottom(10, ScaleTimeSpec::new((jan, mar))).marks(plot);
        let labels = texts(&marks);
        let names: Vec<&str> = labels.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(names, vec!["Jan", "Feb", "Mar"]);
        // Labels sit below the tick: 6 + 3.
        assert_eq!(labels[0].pos, Point::new(50.0, 469.0));
        assert_eq!(labels[2].pos, Point::new(420.0, 469.0));
        assert_eq!(labels[0].anchor, TextAnchor::Middle);
    }

    #[test]
    fn domain_path_draws_outer_ticks() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let marks = AxisSpec::bottom(1, ScaleLinearSpec::new((0.0, 1.0))).marks(plot);
        let domain = marks.iter().find(|m| m.id == MarkId::from_raw(1)).unwrap();
        let MarkPayload::Path(p) = &domain.payload else {
            panic!("domain should be a path");
        };
        assert_eq!(
            p.path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 56.0)),
                PathEl::LineTo(Point::new(0.0, 50.0)),
                PathEl::LineTo(Point::new(100.0, 50.0)),
                PathEl::LineTo(Point::new(100.0, 56.0)),
            ]
        );

        let marks = AxisSpec::left(1, ScaleLinearSpec::new((0.0, 1.0)))
            .with_tick_size_outer(0.0)
            .marks(plot);
        let MarkPayload::Path(p) = &marks[0].payload else {
            panic!("domain should be a path");
        };
        assert_eq!(
            p.path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 50.0)),
                PathEl::LineTo(Point::new(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn left_axis_ticks_point_outward() {
        let plot = Rect::new(40.0, 20.0, 210.0, 120.0);
        let marks = AxisSpec::left(1, ScaleLinearSpec::new((0.0, 100.0)))
            .with_tick_count(4)
            .marks(plot);
        let labels = texts(&marks);
        let names: Vec<&str> = labels.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(names, vec!["0", "20", "40", "60", "80", "100"]);
        assert_eq!(labels[0].pos, Point::new(31.0, 120.0));
        assert_eq!(labels[0].anchor, TextAnchor::End);

        let tick = marks.iter().find(|m| m.id == MarkId::from_raw(2)).unwrap();
        assert_eq!(tick.kind, MarkKind::Path);
        assert_eq!(tick.payload.bounds(), Some(Rect::new(34.0, 120.0, 40.0, 120.0)));
    }

    #[test]
    fn band_axis_centers_ticks_and_uses_labels() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let scale = ScaleBandSpec::new(["Jan 23", "Feb 23", "Mar 23", "Apr 23"]);
        let marks = AxisSpec::bottom(1, scale)
            .with_tick_values([0.0, 2.0])
            .marks(plot);
        let labels = texts(&marks);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "Jan 23");
        assert_eq!(labels[1].text, "Mar 23");
        assert_eq!(labels[0].pos.x, 12.5);
        assert_eq!(labels[1].pos.x, 62.5);
    }

    #[test]
    fn rotated_labels_pivot_around_the_tick() {
        let plot = Rect::new(0.0, 0.0, 100.0, 50.0);
        let marks = AxisSpec::bottom(1, ScaleBandSpec::new(["a"]))
            .with_label_angle(-40.0)
            .with_label_anchor(TextAnchor::End)
            .marks(plot);
        let label = texts(&marks)[0];
        let theta = (-40.0_f64).to_radians();
        assert!(close(label.pos.x, 50.0 - 9.0 * theta.sin()));
        assert!(close(label.pos.y, 50.0 + 9.0 * theta.cos()));
        assert_eq!(label.angle, -40.0);
        assert_eq!(label.anchor, TextAnchor::End);
    }
}
