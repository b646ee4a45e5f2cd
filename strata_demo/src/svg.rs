// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained SVG output driven by scene diffs.

use std::collections::HashMap;
use std::fmt::Write;

use kurbo::Rect;
use peniko::Brush;
use strata_charts::{HeuristicTextMeasurer, TextMeasurer, TextStyle};
use strata_core::{MarkDiff, MarkId, MarkPayload, TextAnchor, TextBaseline, TextPayload};

/// Padding around content that spills past the requested view box.
const OVERFLOW_PAD: f64 = 10.0;

/// Mirror of the scene's retained marks, kept current by applying each frame's diffs.
#[derive(Debug, Default)]
pub(crate) struct SvgScene {
    marks: HashMap<MarkId, (i32, MarkPayload)>,
    view_box: Option<Rect>,
}

impl SvgScene {
    pub(crate) fn set_view_box(&mut self, view_box: Rect) {
        self.view_box = Some(view_box);
    }

    pub(crate) fn len(&self) -> usize {
        self.marks.len()
    }

    pub(crate) fn apply_diffs(&mut self, diffs: &[MarkDiff]) {
        for diff in diffs {
            match diff {
                MarkDiff::Enter {
                    id, z_index, new, ..
                } => {
                    self.marks.insert(*id, (*z_index, (**new).clone()));
                }
                MarkDiff::Update {
                    id,
                    new_z_index,
                    new,
                    ..
                } => {
                    self.marks.insert(*id, (*new_z_index, (**new).clone()));
                }
                MarkDiff::Exit { id, .. } => {
                    self.marks.remove(id);
                }
            }
        }
    }

    /// Serializes the marks in paint order, `(z_index, id)`.
    pub(crate) fn to_svg_string(&self) -> String {
        let view_box = match (self.view_box, self.content_bounds()) {
            (Some(a), Some(b)) if a.union(b) == a => a,
            (Some(a), Some(b)) => a.union(b.inflate(OVERFLOW_PAD, OVERFLOW_PAD)),
            (Some(a), None) => a,
            (None, Some(b)) => b.inflate(OVERFLOW_PAD, OVERFLOW_PAD),
            (None, None) => Rect::new(0.0, 0.0, 100.0, 100.0),
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" width="{}" height="{}" font-family="sans-serif">"#,
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height(),
            view_box.width(),
            view_box.height()
        );

        let mut ordered: Vec<_> = self.marks.iter().collect();
        ordered.sort_by_key(|(id, (z, _))| (*z, id.0));

        for (_, (_, payload)) in ordered {
            match payload {
                MarkPayload::Rect(r) => {
                    let rect = r.rect.abs();
                    let _ = write!(
                        out,
                        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                        rect.x0,
                        rect.y0,
                        rect.width(),
                        rect.height(),
                    );
                    if r.corner_radius > 0.0 {
                        let _ = write!(out, r#" rx="{0}" ry="{0}""#, r.corner_radius);
                    }
                    write_paint_attr(&mut out, "fill", &r.fill);
                    write_stroke_attrs(&mut out, &r.stroke, r.stroke_width);
                    write_opacity(&mut out, r.opacity);
                    out.push_str("/>\n");
                }
                MarkPayload::Path(p) => {
                    let _ = write!(out, r#"<path d="{}""#, p.path.to_svg());
                    write_paint_attr(&mut out, "fill", &p.fill);
                    write_stroke_attrs(&mut out, &p.stroke, p.stroke_width);
                    write_opacity(&mut out, p.opacity);
                    out.push_str("/>\n");
                }
                MarkPayload::Text(t) => write_text(&mut out, t),
            }
        }

        out.push_str("</svg>\n");
        out
    }

    /// Union of the visible marks' extents.
    fn content_bounds(&self) -> Option<Rect> {
        self.marks
            .values()
            .filter(|(_, payload)| payload.opacity() > 0.0)
            .filter_map(|(_, payload)| match payload {
                MarkPayload::Text(t) => Some(text_bounds(t)),
                _ => payload.bounds(),
            })
            .reduce(|a, b| a.union(b))
    }
}

fn write_text(out: &mut String, t: &TextPayload) {
    let baseline = match t.baseline {
        TextBaseline::Middle => "middle",
        TextBaseline::Alphabetic => "alphabetic",
        TextBaseline::Hanging => "hanging",
        TextBaseline::Ideographic => "ideographic",
    };
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
        t.pos.x, t.pos.y, t.font_size, baseline
    );
    if t.font_weight != 400 {
        let _ = write!(out, r#" font-weight="{}""#, t.font_weight);
    }
    if t.angle != 0.0 {
        let _ = write!(
            out,
            r#" transform="rotate({} {} {})""#,
            t.angle, t.pos.x, t.pos.y
        );
    }
    out.push_str(match t.anchor {
        TextAnchor::Start => r#" text-anchor="start""#,
        TextAnchor::Middle => r#" text-anchor="middle""#,
        TextAnchor::End => r#" text-anchor="end""#,
    });
    write_paint_attr(out, "fill", &t.fill);
    write_opacity(out, t.opacity);
    out.push('>');
    out.push_str(&escape_xml(&t.text));
    out.push_str("</text>\n");
}

/// Unrotated extent of a text mark, for sizing the view box.
fn text_bounds(t: &TextPayload) -> Rect {
    let style = TextStyle::new(t.font_size).with_weight(t.font_weight);
    let metrics = HeuristicTextMeasurer.measure(&t.text, style);
    let height = metrics.ascent + metrics.descent;
    let top = match t.baseline {
        TextBaseline::Alphabetic => t.pos.y - metrics.ascent,
        TextBaseline::Hanging => t.pos.y,
        TextBaseline::Middle => t.pos.y - height / 2.0,
        TextBaseline::Ideographic => t.pos.y - height,
    };
    let x0 = match t.anchor {
        TextAnchor::Start => t.pos.x,
        TextAnchor::Middle => t.pos.x - metrics.advance_width / 2.0,
        TextAnchor::End => t.pos.x - metrics.advance_width,
    };
    Rect::new(x0, top, x0 + metrics.advance_width, top + height)
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let fill_opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, fill_opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    let _ = write!(out, r#" {name}="{value}""#);
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{o}""#);
    }
}

fn write_stroke_attrs(out: &mut String, stroke: &Brush, width: f64) {
    if width > 0.0 {
        write_paint_attr(out, "stroke", stroke);
        let _ = write!(out, r#" stroke-width="{width}""#);
    }
}

fn write_opacity(out: &mut String, opacity: f64) {
    if opacity < 1.0 {
        let _ = write!(out, r#" opacity="{opacity}""#);
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
