// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::collections::BTreeSet;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::{PathEl, Point};
use peniko::Color;
use strata_core::{MarkDiff, MarkId, MarkPayload, Scene};
use strata_transforms::StackOffset;

use crate::{
    AXIS_ID_BASE, AxisSpec, CAPTION_ID, COL_Y0, COL_Y1, Curve, HeuristicTextMeasurer,
    InteractionChange, LAYER_ID_BASE, LEGEND_ID_BASE, LegendSwatchesSpec, MAX_SERIES,
    PointerEvent, SeriesSpec, StreamData, StreamgraphChart, StreamgraphInteraction,
    StreamgraphSpec, TooltipRequest, TooltipSpec,
};

const JAN: f64 = 1_672_531_200_000.0;
const FEB: f64 = 1_675_209_600_000.0;
const MAR: f64 = 1_677_628_800_000.0;

fn series() -> Vec<SeriesSpec> {
    vec![
        SeriesSpec::new("GPT-4", Color::from_rgb8(0xe4, 0x1a, 0x1c)),
        SeriesSpec::new("Gemini", Color::from_rgb8(0x37, 0x7e, 0xb8)),
    ]
}

fn two_months() -> StreamData {
    StreamData::new(["GPT-4", "Gemini"])
        .with_row(JAN, vec![1.0, 2.0])
        .with_row(FEB, vec![3.0, 4.0])
}

/// A zero-offset, straight-edged chart whose geometry is easy to compute by hand.
fn flat_chart(scene: &mut Scene) -> StreamgraphChart {
    StreamgraphSpec::new(series())
        .with_offset(StackOffset::Zero)
        .with_curve(Curve::Linear)
        .build(&two_months(), scene, &HeuristicTextMeasurer)
        .unwrap()
        .unwrap()
}

fn texts(marks: &[strata_core::Mark]) -> Vec<&str> {
    marks
        .iter()
        .filter_map(|m| match &m.payload {
            MarkPayload::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn empty_data_leaves_the_scene_untouched() {
    let mut scene = Scene::new();
    let chart = StreamgraphSpec::new(series())
        .build(&StreamData::new(["GPT-4"]), &mut scene, &HeuristicTextMeasurer)
        .unwrap();
    assert!(chart.is_none());
    assert!(scene.tables.is_empty());
    assert_eq!(scene.mark_count(), 0);
}

#[test]
fn y_domain_pads_the_stacked_extent() {
    let mut scene = Scene::new();
    let chart = flat_chart(&mut scene);

    // Stacked extent is [0, 7]; 5% of 7 on each side.
    let (d0, d1) = chart.y_scale().domain();
    assert!((d0 + 0.35).abs() < 1e-9);
    assert!((d1 - 7.35).abs() < 1e-9);
    assert_eq!(chart.y_scale().range(), (460.0, 100.0));
    assert_eq!(chart.x_scale().map(JAN), 50.0);
    assert_eq!(chart.x_scale().map(FEB), 420.0);
}

#[test]
fn layers_follow_series_order() {
    let mut scene = Scene::new();
    let chart = flat_chart(&mut scene);
    let marks = chart.layer_marks(None);

    assert_eq!(marks.len(), 2);
    assert_eq!(marks[0].id, MarkId::from_raw(1_000));
    assert_eq!(marks[1].id, MarkId::from_raw(1_001));
    for mark in &marks {
        let MarkPayload::Path(p) = &mark.payload else {
            panic!("layers are paths");
        };
        assert_eq!(p.opacity, 0.9);
        assert_eq!(p.stroke_width, 0.0);
        assert_eq!(p.path.elements().last(), Some(&PathEl::ClosePath));
    }
    assert_eq!(chart.layer(1).unwrap().key(), "Gemini");
    assert_eq!(chart.layer(1).unwrap().values(), &[2.0, 4.0]);

    let hovered = chart.layer_marks(Some(1));
    assert_eq!(hovered[0].payload.opacity(), 0.9);
    assert_eq!(hovered[1].payload.opacity(), 1.0);
}

#[test]
fn guides_include_axis_legend_and_caption() {
    let mut scene = Scene::new();
    let chart = flat_chart(&mut scene);
    let guides = chart.guide_marks();
    let labels = texts(&guides);

    for text in ["Jan", "Feb", "GPT-4", "Gemini", "Time (Month / Year)"] {
        assert!(labels.contains(&text), "missing {text}");
    }
    let caption = guides
        .iter()
        .find(|m| m.id == MarkId::from_raw(crate::CAPTION_ID))
        .unwrap();
    let MarkPayload::Text(t) = &caption.payload else {
        panic!("caption is text");
    };
    assert_eq!(t.pos, Point::new(235.0, 495.0));
    assert_eq!(t.font_size, 12.0);
}

#[test]
fn layer_at_finds_the_band_under_the_pointer() {
    let mut scene = Scene::new();
    let chart = flat_chart(&mut scene);

    // Mid-plot, Gemini spans [2, 5] and GPT-4 spans [0, 2] in data units.
    assert_eq!(chart.layer_at(Point::new(235.0, 280.0)), Some(1));
    assert_eq!(chart.layer_at(Point::new(235.0, 400.0)), Some(0));
    assert_eq!(chart.layer_at(Point::new(235.0, 120.0)), None);
    assert_eq!(chart.layer_at(Point::new(10.0, 280.0)), None);
}

#[test]
fn layer_at_includes_the_last_date() {
    let mut scene = Scene::new();
    let chart = flat_chart(&mut scene);

    // x = 420 is the plot's right edge; Gemini spans [3, 7] there.
    assert_eq!(chart.layer_at(Point::new(420.0, 280.0)), Some(1));
    assert_eq!(chart.layer_at(Point::new(420.0, 400.0)), Some(0));
    assert_eq!(chart.layer_at(Point::new(50.0, 350.0)), Some(1));
    assert_eq!(chart.layer_at(Point::new(420.5, 280.0)), None);
}

#[test]
fn unsorted_rows_are_ordered_by_date() {
    let mut scene = Scene::new();
    let data = StreamData::new(["GPT-4", "Gemini"])
        .with_row(FEB, vec![3.0, 4.0])
        .with_row(JAN, vec![1.0, 2.0]);
    let chart = StreamgraphSpec::new(series())
        .with_offset(StackOffset::Zero)
        .with_curve(Curve::Linear)
        .build(&data, &mut scene, &HeuristicTextMeasurer)
        .unwrap()
        .unwrap();

    assert_eq!(chart.times(), &[JAN, FEB]);
    assert_eq!(chart.layer(0).unwrap().values(), &[1.0, 3.0]);
    assert_eq!(chart.layer(1).unwrap().values(), &[2.0, 4.0]);
    let table = &scene.tables[&StreamgraphSpec::series_table(1)];
    assert_eq!(table.f64(0, COL_Y0), Some(1.0));
    assert_eq!(table.f64(1, COL_Y1), Some(7.0));

    // Same outline as the sorted input: the top edge runs left to right.
    let mut sorted = Scene::new();
    let expected = flat_chart(&mut sorted);
    assert_eq!(chart.layer(1).unwrap().path(), expected.layer(1).unwrap().path());
}

#[test]
fn id_blocks_do_not_overlap() {
    let blocks = [
        (LAYER_ID_BASE, MAX_SERIES as u64),
        (AXIS_ID_BASE, AxisSpec::ID_SPAN),
        (LEGEND_ID_BASE, LegendSwatchesSpec::ID_SPAN),
        (CAPTION_ID, 1),
        (TooltipSpec::DEFAULT_ID_BASE, TooltipSpec::ID_SPAN),
    ];
    for pair in blocks.windows(2) {
        let (base, span) = pair[0];
        assert!(base + span <= pair[1].0, "block at {base} runs into {}", pair[1].0);
    }
}

#[test]
fn frame_mark_ids_are_unique() {
    let mut scene = Scene::new();
    // A year of rows gives the axis and tooltip a dozen ticks and bars each.
    let mut data = StreamData::new(["GPT-4", "Gemini"]);
    for month in 0..12 {
        let date = chrono::NaiveDate::from_ymd_opt(2023, month + 1, 1).unwrap();
        data.push_row(crate::date_to_ms(date), vec![f64::from(month), 1.0]);
    }
    let chart = StreamgraphSpec::new(series())
        .build(&data, &mut scene, &HeuristicTextMeasurer)
        .unwrap()
        .unwrap();
    let request = TooltipRequest {
        series: 0,
        anchor: Point::new(200.0, 200.0),
        visible: true,
    };
    let marks = chart.marks(Some(0), Some(&request));
    let ids: BTreeSet<u64> = marks.iter().map(|m| m.id.0).collect();
    assert_eq!(ids.len(), marks.len());
}

#[test]
fn wiggle_starts_from_a_zero_baseline() {
    let mut scene = Scene::new();
    let data = two_months().with_row(MAR, vec![2.0, 6.0]);
    let chart = StreamgraphSpec::new(series())
        .build(&data, &mut scene, &HeuristicTextMeasurer)
        .unwrap()
        .unwrap();

    let first = &scene.tables[&StreamgraphSpec::series_table(0)];
    assert_eq!(first.row_count(), 3);
    assert_eq!(first.f64(0, COL_Y0), Some(0.0));
    assert_eq!(first.f64(0, COL_Y1), Some(1.0));

    // Three points per edge: Catmull-Rom emits a cubic per segment.
    let cubics = chart.layers()[0]
        .path()
        .elements()
        .iter()
        .filter(|el| matches!(el, PathEl::CurveTo(..)))
        .count();
    assert_eq!(cubics, 4);
}

#[test]
fn repeated_dates_stay_separate_columns() {
    let mut scene = Scene::new();
    let data = StreamData::new(["GPT-4", "Gemini"])
        .with_row(JAN, vec![1.0, 1.0])
        .with_row(JAN, vec![2.0, 2.0])
        .with_row(FEB, vec![3.0, 3.0]);
    let chart = StreamgraphSpec::new(series())
        .build(&data, &mut scene, &HeuristicTextMeasurer)
        .unwrap()
        .unwrap();
    assert_eq!(chart.times().len(), 3);
    assert_eq!(scene.tables[&StreamgraphSpec::series_table(1)].row_count(), 3);
}

#[test]
fn unknown_series_keys_read_as_zero() {
    let mut scene = Scene::new();
    let spec = StreamgraphSpec::new(vec![
        SeriesSpec::new("GPT-4", Color::BLACK),
        SeriesSpec::new("Ghost", Color::WHITE),
    ]);
    let chart = spec
        .build(&two_months(), &mut scene, &HeuristicTextMeasurer)
        .unwrap()
        .unwrap();
    assert_eq!(chart.layer(1).unwrap().values(), &[0.0, 0.0]);
}

#[test]
fn hover_frames_produce_minimal_diffs() {
    let mut scene = Scene::new();
    let chart = flat_chart(&mut scene);
    let mut hover = StreamgraphInteraction::new();

    let first = scene.tick(hover.marks(&chart));
    assert!(first.iter().all(|d| matches!(d, MarkDiff::Enter { .. })));

    // Entering Gemini raises it and shows the tooltip.
    let change = hover.handle(&chart, PointerEvent::Moved(Point::new(235.0, 280.0)));
    assert_eq!(change, InteractionChange::Entered(1));
    let diffs = scene.tick(hover.marks(&chart));
    assert!(diffs.iter().any(|d| matches!(d, MarkDiff::Update { id, .. } if *id == MarkId::from_raw(1_001))));
    assert!(diffs.iter().all(|d| !matches!(d, MarkDiff::Exit { .. })));
    let panel = scene.mark(MarkId::from_raw(TooltipSpec::DEFAULT_ID_BASE)).unwrap();
    assert_eq!(panel.payload.opacity(), 1.0);
    assert_eq!(
        panel.payload.bounds().unwrap().origin(),
        Point::new(250.0, 270.0)
    );

    // Moving within the layer only moves the tooltip.
    let change = hover.handle(&chart, PointerEvent::Moved(Point::new(236.0, 281.0)));
    assert_eq!(change, InteractionChange::Moved(1));
    let diffs = scene.tick(hover.marks(&chart));
    assert!(!diffs.is_empty());
    assert!(diffs.iter().all(|d| d.id().0 >= TooltipSpec::DEFAULT_ID_BASE));

    // Leaving restores the layer and hides, but keeps, the tooltip.
    let change = hover.handle(&chart, PointerEvent::Left);
    assert_eq!(change, InteractionChange::Left(1));
    let diffs = scene.tick(hover.marks(&chart));
    assert!(diffs.iter().all(|d| !matches!(d, MarkDiff::Exit { .. })));
    assert_eq!(
        scene.mark(MarkId::from_raw(1_001)).unwrap().payload.opacity(),
        0.9
    );
    let panel = scene.mark(MarkId::from_raw(TooltipSpec::DEFAULT_ID_BASE)).unwrap();
    assert_eq!(panel.payload.opacity(), 0.0);

    // Nothing hovered and nothing moves.
    let change = hover.handle(&chart, PointerEvent::Moved(Point::new(5.0, 5.0)));
    assert_eq!(change, InteractionChange::None);
    assert!(scene.tick(hover.marks(&chart)).is_empty());
}

#[test]
fn switching_layers_reuses_tooltip_ids() {
    let mut scene = Scene::new();
    let chart = flat_chart(&mut scene);
    let mut hover = StreamgraphInteraction::new();

    hover.handle(&chart, PointerEvent::Moved(Point::new(235.0, 400.0)));
    scene.tick(hover.marks(&chart));
    let change = hover.handle(&chart, PointerEvent::Moved(Point::new(235.0, 280.0)));
    assert_eq!(change, InteractionChange::Switched { from: 0, to: 1 });

    let diffs = scene.tick(hover.marks(&chart));
    let updated = |raw: u64| {
        diffs
            .iter()
            .any(|d| matches!(d, MarkDiff::Update { id, .. } if *id == MarkId::from_raw(raw)))
    };
    assert!(updated(1_000));
    assert!(updated(1_001));
    assert!(updated(TooltipSpec::DEFAULT_ID_BASE + 1));
    let header = scene
        .mark(MarkId::from_raw(TooltipSpec::DEFAULT_ID_BASE + 1))
        .unwrap();
    let MarkPayload::Text(t) = &header.payload else {
        panic!("header is text");
    };
    assert_eq!(t.text, "Gemini");
}
