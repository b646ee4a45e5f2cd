// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Streamgraph chart: wiggle-stacked smooth layers with a month axis, legend and caption.
//!
//! [`StreamgraphSpec::build`] loads the rows into the scene as a long `(row, x, series,
//! value)` table and runs a transform program over it: one `Stack` (grouped by row,
//! ordered by series) followed by a `Filter` + `Sort` per series. The per-series tables are
//! turned into area outlines once; [`StreamgraphChart`] keeps them so hover frames only
//! change opacities and the tooltip.

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::Color;
use strata_core::{ColId, Mark, MarkId, Scene, TableId, TextAnchor};
use strata_transforms::{
    Predicate, Program, SceneExecutionError, SortOrder, StackOffset, TableFrame, Transform,
};

use crate::axis::AxisSpec;
use crate::curve::Curve;
use crate::layout::{ChartLayout, Margins, Size};
use crate::legend::{LegendItem, LegendSwatchesSpec};
use crate::measure::TextMeasurer;
use crate::scale::{ScaleLinear, ScaleTime, ScaleTimeSpec};
use crate::stacked_area_mark::StackedAreaMarkSpec;
use crate::text_mark::TextMarkSpec;
use crate::tooltip::{TooltipRequest, TooltipSpec};
use crate::z_order;

/// Long input table written by [`StreamgraphSpec::build`].
pub const DATA_TABLE: TableId = TableId(1);
/// Stack output table.
pub const STACKED_TABLE: TableId = TableId(2);
/// Per-series tables are `SERIES_TABLE_BASE + series_index`.
pub const SERIES_TABLE_BASE: u32 = 100;

/// Row index within the input data.
pub const COL_ROW: ColId = ColId(0);
/// Date in epoch milliseconds.
pub const COL_X: ColId = ColId(1);
/// Series index.
pub const COL_SERIES: ColId = ColId(2);
/// Raw value.
pub const COL_VALUE: ColId = ColId(3);
/// Stack start.
pub const COL_Y0: ColId = ColId(4);
/// Stack end.
pub const COL_Y1: ColId = ColId(5);

/// Layer `i` has mark id `LAYER_ID_BASE + i`.
pub const LAYER_ID_BASE: u64 = 1_000;
/// Id base of the month axis.
pub const AXIS_ID_BASE: u64 = 10_000;
/// Id base of the legend.
pub const LEGEND_ID_BASE: u64 = 20_000;
/// Id of the caption.
pub const CAPTION_ID: u64 = 30_000;
/// Series past this count are not drawn; it keeps layer ids below [`AXIS_ID_BASE`].
pub const MAX_SERIES: usize = LegendSwatchesSpec::MAX_ITEMS;

/// A named series and its color.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesSpec {
    /// Column key in the input data.
    pub key: String,
    /// Layer and swatch color.
    pub fill: Color,
}

impl SeriesSpec {
    /// Creates a series spec.
    pub fn new(key: impl Into<String>, fill: Color) -> Self {
        Self {
            key: key.into(),
            fill,
        }
    }
}

/// One dated row of series values.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamRow {
    /// Epoch milliseconds (UTC).
    pub time_ms: f64,
    /// Values in [`StreamData::keys`] order.
    pub values: Vec<f64>,
}

/// Wide time-series data: one row per date, one value per key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StreamData {
    /// Series keys, in column order.
    pub keys: Vec<String>,
    /// Rows. [`StreamgraphSpec::build`] orders them by date.
    pub rows: Vec<StreamRow>,
}

impl StreamData {
    /// Creates empty data with the given keys.
    pub fn new(keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push_row(&mut self, time_ms: f64, values: Vec<f64>) {
        self.rows.push(StreamRow { time_ms, values });
    }

    /// Builder-style [`StreamData::push_row`].
    pub fn with_row(mut self, time_ms: f64, values: Vec<f64>) -> Self {
        self.push_row(time_ms, values);
        self
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Position of `key` in [`StreamData::keys`].
    pub fn key_index(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// Row dates in epoch milliseconds.
    pub fn times(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.time_ms).collect()
    }

    /// Values of `key` per row. Unknown keys and short rows read as 0.
    pub fn values_of(&self, key: &str) -> Vec<f64> {
        let index = self.key_index(key);
        self.rows
            .iter()
            .map(|r| index.and_then(|i| r.values.get(i).copied()).unwrap_or(0.0))
            .collect()
    }

    /// `(min, max)` over finite dates.
    pub fn time_extent(&self) -> Option<(f64, f64)> {
        extent(self.rows.iter().map(|r| r.time_ms))
    }
}

fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
}

/// Configuration of a streamgraph.
#[derive(Clone, Debug)]
pub struct StreamgraphSpec {
    /// Series in stacking (and legend) order.
    pub series: Vec<SeriesSpec>,
    /// Full view size.
    pub view_size: Size,
    /// Margins around the plot.
    pub margins: Margins,
    /// Gap between plot and legend.
    pub legend_gap: f64,
    /// Stack baseline.
    pub offset: StackOffset,
    /// Layer edge interpolation.
    pub curve: Curve,
    /// Opacity of layers at rest.
    pub layer_opacity: f64,
    /// Opacity of the hovered layer.
    pub hover_opacity: f64,
    /// Caption under the plot.
    pub caption: String,
    /// Caption font size.
    pub caption_font_size: f64,
    /// Fraction of the stacked extent added above and below.
    pub y_padding: f64,
    /// Month interval between axis ticks.
    pub tick_every_months: u32,
    /// Month axis label font size.
    pub axis_font_size: f64,
    /// Hover tooltip.
    pub tooltip: TooltipSpec,
}

impl StreamgraphSpec {
    /// Default caption.
    pub const DEFAULT_CAPTION: &'static str = "Time (Month / Year)";

    /// Creates a 600x500 wiggle streamgraph over `series`.
    pub fn new(series: Vec<SeriesSpec>) -> Self {
        Self {
            series,
            view_size: Size::new(600.0, 500.0),
            margins: Margins::new(100.0, 180.0, 40.0, 50.0),
            legend_gap: ChartLayout::DEFAULT_LEGEND_GAP,
            offset: StackOffset::Wiggle,
            curve: Curve::default(),
            layer_opacity: 0.9,
            hover_opacity: 1.0,
            caption: String::from(Self::DEFAULT_CAPTION),
            caption_font_size: 12.0,
            y_padding: 0.05,
            tick_every_months: 1,
            axis_font_size: 10.0,
            tooltip: TooltipSpec::new(),
        }
    }

    /// Sets the view size.
    pub fn with_view_size(mut self, size: Size) -> Self {
        self.view_size = size;
        self
    }

    /// Sets the margins around the plot.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Sets the stack baseline.
    pub fn with_offset(mut self, offset: StackOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the layer interpolation.
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Sets the resting and hovered layer opacities.
    pub fn with_opacities(mut self, layer: f64, hover: f64) -> Self {
        self.layer_opacity = layer;
        self.hover_opacity = hover;
        self
    }

    /// Sets the caption text.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Sets the vertical padding fraction.
    pub fn with_y_padding(mut self, fraction: f64) -> Self {
        self.y_padding = fraction.max(0.0);
        self
    }

    /// Sets the month interval between axis ticks.
    pub fn with_tick_every_months(mut self, every: u32) -> Self {
        self.tick_every_months = every.max(1);
        self
    }

    /// Sets the tooltip.
    pub fn with_tooltip(mut self, tooltip: TooltipSpec) -> Self {
        self.tooltip = tooltip;
        self
    }

    /// The table holding series `index` after [`StreamgraphSpec::program`] runs.
    pub fn series_table(index: usize) -> TableId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "series counts are far below u32::MAX"
        )]
        {
            TableId(SERIES_TABLE_BASE + index as u32)
        }
    }

    /// The stack and per-series extraction program over [`DATA_TABLE`].
    pub fn program(&self) -> Program {
        let mut p = Program::new().with(Transform::Stack {
            input: DATA_TABLE,
            output: STACKED_TABLE,
            group_by: vec![COL_ROW],
            offset: self.offset,
            sort_by: Some(COL_SERIES),
            sort_order: SortOrder::Asc,
            field: COL_VALUE,
            output_start: COL_Y0,
            output_end: COL_Y1,
            columns: vec![COL_ROW, COL_X, COL_SERIES, COL_VALUE],
        });
        let columns = vec![COL_ROW, COL_X, COL_Y0, COL_Y1];
        for s in 0..self.series.len() {
            let out = Self::series_table(s);
            p.push(Transform::Filter {
                input: STACKED_TABLE,
                output: out,
                predicate: Predicate::equals(COL_SERIES, s as f64),
                columns: columns.clone(),
            });
            p.push(Transform::Sort {
                input: out,
                output: out,
                by: COL_ROW,
                order: SortOrder::Asc,
                columns: columns.clone(),
            });
        }
        p
    }

    /// Lays `data` out as the long input table.
    fn long_table(&self, data: &StreamData) -> Result<TableFrame, SceneExecutionError> {
        let k = self.series.len();
        let n = data.rows.len() * k;
        let mut keys = Vec::with_capacity(n);
        let (mut row_col, mut x_col, mut series_col, mut value_col) = (
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
        );
        let indices: Vec<Option<usize>> =
            self.series.iter().map(|s| data.key_index(&s.key)).collect();
        for (r, row) in data.rows.iter().enumerate() {
            for (s, index) in indices.iter().enumerate() {
                keys.push((r * k + s) as u64);
                row_col.push(r as f64);
                x_col.push(row.time_ms);
                series_col.push(s as f64);
                value_col.push(index.and_then(|i| row.values.get(i).copied()).unwrap_or(0.0));
            }
        }
        TableFrame::from_columns(
            keys,
            [
                (COL_ROW, row_col),
                (COL_X, x_col),
                (COL_SERIES, series_col),
                (COL_VALUE, value_col),
            ],
        )
        .map_err(|err| SceneExecutionError::FrameError {
            table: DATA_TABLE,
            err,
        })
    }

    /// Builds the chart, writing its tables into `scene`.
    ///
    /// Returns `Ok(None)` without touching the scene when there are no rows or no series.
    /// Rows are stably sorted by date first, so rows sharing a date keep their input order.
    /// The scene's marks are not ticked; pass [`StreamgraphChart::marks`] to
    /// [`Scene::tick`].
    pub fn build(
        &self,
        data: &StreamData,
        scene: &mut Scene,
        measurer: &dyn TextMeasurer,
    ) -> Result<Option<StreamgraphChart>, SceneExecutionError> {
        log::debug!(
            "building streamgraph from {} rows and {} series",
            data.rows.len(),
            self.series.len()
        );
        if data.rows.is_empty() || self.series.is_empty() {
            return Ok(None);
        }
        if self.series.len() > MAX_SERIES {
            log::warn!(
                "drawing the first {MAX_SERIES} of {} series",
                self.series.len()
            );
            let mut spec = self.clone();
            spec.series.truncate(MAX_SERIES);
            return spec.build(data, scene, measurer);
        }

        let mut data = data.clone();
        data.rows.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
        let data = &data;

        scene.insert_table(self.long_table(data)?.into_table(DATA_TABLE));
        let out = self.program().apply_to_scene(scene)?;

        let layout = ChartLayout::arrange_with_gap(self.view_size, self.margins, self.legend_gap);
        let plot = layout.plot;

        let (t0, t1) = data.time_extent().unwrap_or((0.0, 0.0));
        let x_spec = ScaleTimeSpec::new((t0, t1)).with_tick_every_months(self.tick_every_months);
        let x_scale = x_spec.instantiate((plot.x0, plot.x1));

        let stacked = out.get(STACKED_TABLE);
        let lo = stacked
            .and_then(|f| f.column(COL_Y0))
            .and_then(|c| extent(c.iter().copied()))
            .map(|(lo, _)| lo);
        let hi = stacked
            .and_then(|f| f.column(COL_Y1))
            .and_then(|c| extent(c.iter().copied()))
            .map(|(_, hi)| hi);
        let (y_min, y_max) = match (lo, hi) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => (0.0, 0.0),
        };
        let span = if y_max - y_min == 0.0 {
            1.0
        } else {
            y_max - y_min
        };
        let pad = span * self.y_padding;
        let y_scale = ScaleLinear::new((y_min - pad, y_max + pad), (plot.y1, plot.y0));

        let times = data.times();
        let mut layers = Vec::with_capacity(self.series.len());
        for (i, series) in self.series.iter().enumerate() {
            let spec = StackedAreaMarkSpec::new(
                MarkId::from_raw(LAYER_ID_BASE + i as u64),
                Self::series_table(i),
                (COL_X, COL_Y0, COL_Y1),
                x_scale,
                y_scale,
            )
            .with_curve(self.curve)
            .with_fill(series.fill)
            .with_z_index(z_order::SERIES_FILL);
            let path = spec.path_in(scene).unwrap_or_default();
            log::trace!(
                "layer {i} ({}): {} path elements",
                series.key,
                path.elements().len()
            );
            layers.push(StreamLayer {
                key: series.key.clone(),
                fill: series.fill,
                id: spec.id,
                bounds: path.bounding_box(),
                path,
                values: data.values_of(&series.key),
            });
        }

        let mut guides = AxisSpec::bottom(AXIS_ID_BASE, x_spec)
            .with_label_font_size(self.axis_font_size)
            .marks(plot);

        let legend = LegendSwatchesSpec::new(
            LEGEND_ID_BASE,
            self.series
                .iter()
                .map(|s| LegendItem::solid(s.key.clone(), s.fill))
                .collect(),
        )
        .at(layout.legend_origin.x, layout.legend_origin.y);
        let legend_bounds = legend.bounds(measurer);
        if legend_bounds.x1 > layout.view.x1 || legend_bounds.y1 > layout.view.y1 {
            log::warn!(
                "legend ({:.0}x{:.0}) overflows the {:.0}x{:.0} view",
                legend_bounds.width(),
                legend_bounds.height(),
                layout.view.width(),
                layout.view.height()
            );
        }
        guides.extend(legend.marks());

        guides.push(
            TextMarkSpec::new(
                MarkId::from_raw(CAPTION_ID),
                layout.caption_anchor,
                self.caption.clone(),
            )
            .with_font_size(self.caption_font_size)
            .with_anchor(TextAnchor::Middle)
            .with_z_index(z_order::TITLES)
            .mark(),
        );

        Ok(Some(StreamgraphChart {
            layout,
            x_scale,
            y_scale,
            times,
            layers,
            guides,
            legend_bounds,
            layer_opacity: self.layer_opacity,
            hover_opacity: self.hover_opacity,
            tooltip: self.tooltip.clone(),
        }))
    }
}

const RIGHT_EDGE_INSET: f64 = 1e-6;

/// A resolved layer of a built streamgraph.
#[derive(Clone, Debug)]
pub struct StreamLayer {
    key: String,
    fill: Color,
    id: MarkId,
    path: BezPath,
    bounds: Rect,
    values: Vec<f64>,
}

impl StreamLayer {
    /// Series key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Layer color.
    pub fn fill(&self) -> Color {
        self.fill
    }

    /// Mark id of the layer's path.
    pub fn id(&self) -> MarkId {
        self.id
    }

    /// Area outline in view coordinates.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Raw (unstacked) values, one per row.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn contains(&self, pt: Point) -> bool {
        let b = self.bounds;
        if self.path.elements().is_empty()
            || pt.x < b.x0
            || pt.x > b.x1
            || pt.y < b.y0
            || pt.y > b.y1
        {
            return false;
        }
        // Winding is half-open in x; the last date's edge still belongs to the layer.
        let pt = if pt.x == b.x1 {
            Point::new(b.x1 - RIGHT_EDGE_INSET, pt.y)
        } else {
            pt
        };
        self.path.contains(pt)
    }
}

/// A built streamgraph: resolved scales, layer outlines and guide marks.
#[derive(Clone, Debug)]
pub struct StreamgraphChart {
    layout: ChartLayout,
    x_scale: ScaleTime,
    y_scale: ScaleLinear,
    times: Vec<f64>,
    layers: Vec<StreamLayer>,
    guides: Vec<Mark>,
    legend_bounds: Rect,
    layer_opacity: f64,
    hover_opacity: f64,
    tooltip: TooltipSpec,
}

impl StreamgraphChart {
    /// The arranged chart regions.
    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Date scale.
    pub fn x_scale(&self) -> ScaleTime {
        self.x_scale
    }

    /// Stacked value scale.
    pub fn y_scale(&self) -> ScaleLinear {
        self.y_scale
    }

    /// Row dates in epoch milliseconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Layers in series order.
    pub fn layers(&self) -> &[StreamLayer] {
        &self.layers
    }

    /// Returns layer `index`, if present.
    pub fn layer(&self, index: usize) -> Option<&StreamLayer> {
        self.layers.get(index)
    }

    /// Measured legend extent.
    pub fn legend_bounds(&self) -> Rect {
        self.legend_bounds
    }

    /// The tooltip used by [`StreamgraphChart::tooltip_marks`].
    pub fn tooltip(&self) -> &TooltipSpec {
        &self.tooltip
    }

    /// Layer path marks; `hovered` draws at the hover opacity.
    pub fn layer_marks(&self, hovered: Option<usize>) -> Vec<Mark> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, layer)| {
                let opacity = if hovered == Some(i) {
                    self.hover_opacity
                } else {
                    self.layer_opacity
                };
                Mark::builder(layer.id)
                    .path()
                    .z_index(z_order::SERIES_FILL)
                    .shape(layer.path.clone())
                    .fill(layer.fill)
                    .opacity(opacity)
                    .build()
            })
            .collect()
    }

    /// Axis, legend and caption marks.
    pub fn guide_marks(&self) -> Vec<Mark> {
        self.guides.clone()
    }

    /// Tooltip marks for `request`; empty if the series does not exist.
    pub fn tooltip_marks(&self, request: &TooltipRequest) -> Vec<Mark> {
        let Some(layer) = self.layers.get(request.series) else {
            return Vec::new();
        };
        self.tooltip
            .marks_for(request, &layer.key, layer.fill, &self.times, &layer.values)
    }

    /// Every mark of one frame.
    pub fn marks(&self, hovered: Option<usize>, tooltip: Option<&TooltipRequest>) -> Vec<Mark> {
        let mut out = self.layer_marks(hovered);
        out.extend(self.guide_marks());
        if let Some(request) = tooltip {
            out.extend(self.tooltip_marks(request));
        }
        out
    }

    /// The topmost layer under `pt`.
    ///
    /// Layers share a z-index, so later series paint over earlier ones and win ties.
    pub fn layer_at(&self, pt: Point) -> Option<usize> {
        self.layers.iter().rposition(|layer| layer.contains(pt))
    }
}
