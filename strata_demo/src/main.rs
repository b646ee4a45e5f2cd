// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Streamgraph renderer for CSV time series.
//!
//! `render` writes a single SVG, optionally with a simulated hover. `report` writes an HTML
//! page with the resting chart followed by one hovered frame per series; every frame is
//! produced by diffing against the previous one, the same way an interactive renderer
//! would receive it.

mod cli;
mod config;
mod html;
mod svg;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use kurbo::Point;
use peniko::Color;
use strata_charts::{
    COL_X, COL_Y0, COL_Y1, HeuristicTextMeasurer, PLOT_BACKGROUND, PointerEvent, RectMarkSpec,
    StreamData, StreamgraphChart, StreamgraphInteraction, StreamgraphSpec,
};
use strata_core::{Mark, MarkId, Scene};
use strata_data::{FromRows, read_csv};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, SourceArgs};
use crate::config::ChartConfig;
use crate::html::HtmlSection;
use crate::svg::SvgScene;

/// Monthly usage of five LLM families, bundled for `--sample`.
const SAMPLE_CSV: &str = include_str!("../data/llm_usage.csv");

/// Id of the white view background; chart ids start at 1000.
const BACKGROUND_ID: u64 = 1;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    match cli.command {
        Commands::Render {
            source,
            output,
            hover,
        } => render(&source, &output, hover),
        Commands::Report { source, output } => report(&source, &output),
        Commands::Config { output } => {
            let json = serde_json::to_string_pretty(&ChartConfig::default())?;
            match output {
                Some(path) => write_output(&path, &json),
                None => {
                    println!("{json}");
                    Ok(())
                }
            }
        }
    }
}

/// `RUST_LOG` filters output (default `info`); library `log` records go through the
/// same subscriber.
fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("installing subscriber")?;
    tracing_log::LogTracer::init().context("bridging log records")?;
    Ok(())
}

fn load(source: &SourceArgs) -> Result<(StreamgraphSpec, StreamData)> {
    let config = ChartConfig::load(source.config.as_deref())?;
    let keys = config.keys();
    let data = match (&source.input, source.sample) {
        (_, true) => {
            let rows = read_csv(SAMPLE_CSV.as_bytes()).context("parsing bundled sample")?;
            StreamData::from_rows(&rows, &keys)
        }
        (Some(path), false) => strata_data::load(path, &keys)
            .with_context(|| format!("loading {}", path.display()))?,
        (None, false) => return Err(anyhow!("either --input or --sample is required")),
    };
    info!(rows = data.len(), series = keys.len(), "loaded data");
    Ok((config.spec()?, data))
}

fn build(
    spec: &StreamgraphSpec,
    data: &StreamData,
    scene: &mut Scene,
) -> Result<StreamgraphChart> {
    spec.build(data, scene, &HeuristicTextMeasurer)?
        .ok_or_else(|| anyhow!("no rows with a parseable date"))
}

/// Scene plus its SVG mirror; each frame is a diff against the last.
struct Frames {
    scene: Scene,
    svg: SvgScene,
    background: Mark,
}

impl Frames {
    fn new(scene: Scene, chart: &StreamgraphChart) -> Self {
        let view = chart.layout().view;
        let mut svg = SvgScene::default();
        svg.set_view_box(view);
        let background = RectMarkSpec::new(MarkId::from_raw(BACKGROUND_ID), view)
            .with_fill(Color::WHITE)
            .with_z_index(PLOT_BACKGROUND)
            .mark();
        Self {
            scene,
            svg,
            background,
        }
    }

    /// Ticks the scene with `marks` and returns the diff count and the resulting SVG.
    fn draw(&mut self, mut marks: Vec<Mark>) -> (usize, String) {
        marks.push(self.background.clone());
        let diffs = self.scene.tick(marks);
        self.svg.apply_diffs(&diffs);
        debug!(diffs = diffs.len(), marks = self.svg.len(), "frame");
        (diffs.len(), self.svg.to_svg_string())
    }
}

fn render(source: &SourceArgs, output: &Path, hover: Option<Point>) -> Result<()> {
    let (spec, data) = load(source)?;
    let mut scene = Scene::new();
    let chart = build(&spec, &data, &mut scene)?;
    let mut frames = Frames::new(scene, &chart);

    let mut interaction = StreamgraphInteraction::new();
    let change = hover.map(|pt| interaction.handle(&chart, PointerEvent::Moved(pt)));
    if change.is_some_and(|c| !c.is_visible()) {
        warn!(?hover, "hover point is not over any layer");
    }
    let (_, svg) = frames.draw(interaction.marks(&chart));
    write_output(output, &svg)
}

fn report(source: &SourceArgs, output: &Path) -> Result<()> {
    let (spec, data) = load(source)?;
    let sections = report_sections(&spec, &data)?;
    write_output(output, &html::render_report("Streamgraph", &sections))
}

fn report_sections(spec: &StreamgraphSpec, data: &StreamData) -> Result<Vec<HtmlSection>> {
    let mut scene = Scene::new();
    let chart = build(spec, data, &mut scene)?;
    let pointers: Vec<_> = (0..chart.layers().len())
        .map(|i| hover_point(&chart, &scene, i))
        .collect();
    let mut frames = Frames::new(scene, &chart);
    let mut interaction = StreamgraphInteraction::new();

    let (_, svg) = frames.draw(interaction.marks(&chart));
    let mut sections = vec![HtmlSection {
        title: "Streamgraph".to_string(),
        description: format!(
            "{} series over {} dates, stacked with a {:?} baseline.",
            chart.layers().len(),
            chart.times().len(),
            spec.offset
        ),
        svg,
    }];

    for (layer, pointer) in chart.layers().iter().zip(pointers) {
        let Some(pt) = pointer else {
            warn!(series = layer.key(), "no hoverable point; skipping snapshot");
            continue;
        };
        let change = interaction.handle(&chart, PointerEvent::Moved(pt));
        let (diffs, svg) = frames.draw(interaction.marks(&chart));
        sections.push(HtmlSection {
            title: format!("Hover: {}", layer.key()),
            description: format!(
                "Pointer at ({:.0}, {:.0}), {change:?}: {diffs} mark diffs from the previous frame.",
                pt.x, pt.y
            ),
            svg,
        });
    }

    if interaction.state().hovered.is_some() {
        interaction.handle(&chart, PointerEvent::Left);
        let (diffs, svg) = frames.draw(interaction.marks(&chart));
        sections.push(HtmlSection {
            title: "Pointer left".to_string(),
            description: format!(
                "Layers return to rest and the tooltip is hidden: {diffs} mark diffs."
            ),
            svg,
        });
    }
    Ok(sections)
}

/// A point inside layer `index`, preferring its thickest date.
fn hover_point(chart: &StreamgraphChart, scene: &Scene, index: usize) -> Option<Point> {
    let table = scene.tables.get(&StreamgraphSpec::series_table(index))?;
    let values = chart.layer(index)?.values();
    let mut rows: Vec<usize> = (0..table.row_count()).collect();
    rows.sort_by(|&a, &b| {
        let value = |r: usize| values.get(r).copied().unwrap_or(0.0);
        value(b).total_cmp(&value(a))
    });
    rows.into_iter().find_map(|row| {
        let x = chart.x_scale().map(table.f64(row, COL_X)?);
        let mid = (table.f64(row, COL_Y0)? + table.f64(row, COL_Y1)?) / 2.0;
        let pt = Point::new(x, chart.y_scale().map(mid));
        (chart.layer_at(pt) == Some(index)).then_some(pt)
    })
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}
