// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend mark generation.
//!
//! A vertical list of color swatches with text labels, one row per series.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::{Brush, Color};
use strata_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::layout::Size;
use crate::measure::{TextMeasurer, TextMetrics, TextStyle};
use crate::rect_mark::RectMarkSpec;
use crate::text_mark::TextMarkSpec;
use crate::z_order;

fn union_rect(a: Rect, b: Rect) -> Rect {
    Rect::new(
        a.x0.min(b.x0),
        a.y0.min(b.y0),
        a.x1.max(b.x1),
        a.y1.max(b.y1),
    )
}

/// Approximate bounds of an unrotated text run.
fn text_bounds(
    pos: Point,
    metrics: TextMetrics,
    anchor: TextAnchor,
    baseline: TextBaseline,
) -> Rect {
    let w = metrics.advance_width;
    let h = metrics.line_height();
    let (x0, x1) = match anchor {
        TextAnchor::Start => (pos.x, pos.x + w),
        TextAnchor::Middle => (pos.x - w * 0.5, pos.x + w * 0.5),
        TextAnchor::End => (pos.x - w, pos.x),
    };
    let (y0, y1) = match baseline {
        TextBaseline::Middle => (pos.y - h * 0.5, pos.y + h * 0.5),
        TextBaseline::Alphabetic => (pos.y - metrics.ascent, pos.y + metrics.descent),
        TextBaseline::Hanging => (pos.y, pos.y + h),
        TextBaseline::Ideographic => (pos.y - h, pos.y),
    };
    Rect::new(x0, y0, x1, y1)
}

/// A simple legend row item.
#[derive(Clone, Debug)]
pub struct LegendItem {
    /// The label string shown next to the swatch.
    pub label: String,
    /// The swatch fill paint.
    pub fill: Brush,
}

impl LegendItem {
    /// Convenience constructor for a solid-color swatch.
    pub fn solid(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            fill: Brush::Solid(color),
        }
    }
}

/// A positioned legend.
#[derive(Clone, Debug)]
pub struct LegendSwatches {
    spec: LegendSwatchesSpec,
    origin: Point,
}

impl LegendSwatches {
    /// Generate legend marks (swatch rect + label text per item).
    ///
    /// Swatch ids are `id_base + i`; label ids are `id_base + 1000 + i`. Items past
    /// [`LegendSwatchesSpec::MAX_ITEMS`] are not drawn.
    pub fn marks(&self) -> Vec<Mark> {
        let spec = &self.spec;
        if spec.items.len() > LegendSwatchesSpec::MAX_ITEMS {
            log::warn!(
                "legend {}: dropping {} of {} items",
                spec.id_base,
                spec.items.len() - LegendSwatchesSpec::MAX_ITEMS,
                spec.items.len()
            );
        }
        let items = spec.items.iter().take(LegendSwatchesSpec::MAX_ITEMS);
        let mut out = Vec::with_capacity(items.len() * 2);
        for (i, item) in items.enumerate() {
            let row = self.row_origin(i);
            out.push(
                RectMarkSpec::new(
                    MarkId::from_raw(spec.id_base + i as u64),
                    Rect::from_origin_size(row, (spec.swatch_size, spec.swatch_size)),
                )
                .with_fill(item.fill.clone())
                .with_z_index(z_order::LEGEND_SWATCHES)
                .mark(),
            );
            out.push(
                TextMarkSpec::new(
                    MarkId::from_raw(spec.id_base + LegendSwatchesSpec::LABEL_ID_OFFSET + i as u64),
                    self.label_pos(i),
                    item.label.clone(),
                )
                .with_font_size(spec.font_size)
                .with_fill(spec.text_fill.clone())
                .with_anchor(TextAnchor::Start)
                .with_baseline(TextBaseline::Alphabetic)
                .with_z_index(z_order::LEGEND_LABELS)
                .mark(),
            );
        }
        out
    }

    fn row_origin(&self, i: usize) -> Point {
        Point::new(
            self.origin.x,
            self.origin.y + self.spec.row_step * i as f64,
        )
    }

    fn label_pos(&self, i: usize) -> Point {
        self.row_origin(i) + (self.spec.label_dx, self.spec.label_dy)
    }

    /// Estimates legend bounds using the provided text measurer.
    pub fn bounds(&self, measurer: &dyn TextMeasurer) -> Rect {
        let spec = &self.spec;
        let style = TextStyle::new(spec.font_size);
        let mut bounds: Option<Rect> = None;
        for (i, item) in spec.items.iter().enumerate() {
            let swatch = Rect::from_origin_size(self.row_origin(i), (spec.swatch_size, spec.swatch_size));
            let label = text_bounds(
                self.label_pos(i),
                measurer.measure(&item.label, style),
                TextAnchor::Start,
                TextBaseline::Alphabetic,
            );
            let row = union_rect(swatch, label);
            bounds = Some(bounds.map_or(row, |b| union_rect(b, row)));
        }
        bounds.unwrap_or_else(|| Rect::from_origin_size(self.origin, (0.0, 0.0)))
    }
}

/// An unpositioned legend specification (swatches + labels).
///
/// Measure with [`LegendSwatchesSpec::measure`], then place with [`LegendSwatchesSpec::at`].
#[derive(Clone, Debug)]
pub struct LegendSwatchesSpec {
    /// Stable-id base; each generated mark uses a deterministic offset from this base.
    pub id_base: u64,
    /// Swatch square size.
    pub swatch_size: f64,
    /// Distance between the tops of consecutive rows.
    pub row_step: f64,
    /// Label x offset from the row origin.
    pub label_dx: f64,
    /// Label baseline offset from the row origin.
    pub label_dy: f64,
    /// Label font size.
    pub font_size: f64,
    /// Label color.
    pub text_fill: Brush,
    /// Items in display order.
    pub items: Vec<LegendItem>,
}

impl LegendSwatchesSpec {
    /// Ids used by one legend: `id_base..id_base + ID_SPAN`.
    pub const ID_SPAN: u64 = 2 * Self::LABEL_ID_OFFSET;
    /// Items past this count are not drawn.
    pub const MAX_ITEMS: usize = 1_000;

    const LABEL_ID_OFFSET: u64 = 1_000;

    /// Creates a legend with 14px swatches on a 22px row step and 12px labels at `(20, 11)`.
    pub fn new(id_base: u64, items: Vec<LegendItem>) -> Self {
        Self {
            id_base,
            swatch_size: 14.0,
            row_step: 22.0,
            label_dx: 20.0,
            label_dy: 11.0,
            font_size: 12.0,
            text_fill: Brush::Solid(Color::BLACK),
            items,
        }
    }

    /// Set the label text paint.
    pub fn with_text_fill(mut self, text_fill: impl Into<Brush>) -> Self {
        self.text_fill = text_fill.into();
        self
    }

    /// Set the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the swatch size.
    pub fn with_swatch_size(mut self, swatch_size: f64) -> Self {
        self.swatch_size = swatch_size;
        self
    }

    /// Set the distance between rows.
    pub fn with_row_step(mut self, row_step: f64) -> Self {
        self.row_step = row_step;
        self
    }

    /// Measures the desired legend size (width/height).
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> Size {
        let b = self.at(0.0, 0.0).bounds(measurer);
        Size::new(b.width(), b.height())
    }

    /// Creates a positioned legend at the given origin.
    pub fn at(&self, x: f64, y: f64) -> LegendSwatches {
        LegendSwatches {
            spec: self.clone(),
            origin: Point::new(x, y),
        }
    }

    /// Generates marks for this legend for the given origin.
    pub fn marks(&self, x: f64, y: f64) -> Vec<Mark> {
        self.at(x, y).marks()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use strata_core::MarkPayload;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    fn items() -> Vec<LegendItem> {
        vec![
            LegendItem::solid("GPT-4", Color::from_rgb8(0xe4, 0x1a, 0x1c)),
            LegendItem::solid("Gemini", Color::from_rgb8(0x37, 0x7e, 0xb8)),
        ]
    }

    #[test]
    fn rows_step_down_by_22() {
        let marks = LegendSwatchesSpec::new(100, items()).marks(435.0, 100.0);
        assert_eq!(marks.len(), 4);

        let swatch = marks.iter().find(|m| m.id == MarkId::from_raw(101)).unwrap();
        assert_eq!(
            swatch.payload.bounds(),
            Some(Rect::new(435.0, 122.0, 449.0, 136.0))
        );

        let label = marks.iter().find(|m| m.id == MarkId::from_raw(1101)).unwrap();
        let MarkPayload::Text(t) = &label.payload else {
            panic!("label should be text");
        };
        assert_eq!(t.pos, Point::new(455.0, 133.0));
        assert_eq!(t.text, "Gemini");
        assert_eq!(t.font_size, 12.0);
    }

    #[test]
    fn measure_covers_swatches_and_labels() {
        let size = LegendSwatchesSpec::new(0, items()).measure(&HeuristicTextMeasurer);
        // Widest label: "Gemini" at 0.6 * 12 * 6 = 43.2, starting at x = 20.
        assert!((size.width - 63.2).abs() < 1e-9);
        // Last row: label descends to 22 + 11 + 2.4; the swatch bottom is 22 + 14.
        assert_eq!(size.height, 36.0);
    }

    #[test]
    fn empty_legend_has_empty_bounds() {
        let legend = LegendSwatchesSpec::new(0, Vec::new()).at(5.0, 6.0);
        assert!(legend.marks().is_empty());
        assert_eq!(
            legend.bounds(&HeuristicTextMeasurer),
            Rect::new(5.0, 6.0, 5.0, 6.0)
        );
    }
}
