// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark definitions and the fluent mark builder.

extern crate alloc;

use alloc::string::String;

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::{Brush, Color};

use crate::ids::MarkId;

/// The primitive kind of a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// Axis-aligned rectangle.
    Rect,
    /// Arbitrary Bézier path.
    Path,
    /// A single line of unshaped text.
    Text,
}

/// Horizontal text anchor, matching SVG `text-anchor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// The position is the start of the text.
    Start,
    /// The position is the horizontal center of the text.
    Middle,
    /// The position is the end of the text.
    End,
}

/// Vertical text baseline, matching SVG `dominant-baseline`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// Alphabetic baseline.
    Alphabetic,
    /// Vertical middle.
    Middle,
    /// Top of the em box.
    Hanging,
    /// Ideographic baseline (bottom of the em box).
    Ideographic,
}

/// Rectangle geometry and paint.
#[derive(Clone, Debug, PartialEq)]
pub struct RectPayload {
    /// Geometry in scene coordinates.
    pub rect: Rect,
    /// Fill paint.
    pub fill: Brush,
    /// Outline paint, used when `stroke_width > 0`.
    pub stroke: Brush,
    /// Outline width.
    pub stroke_width: f64,
    /// Corner radius; `0` for square corners.
    pub corner_radius: f64,
    /// Group opacity in `[0, 1]`.
    pub opacity: f64,
}

/// Path geometry and paint.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPayload {
    /// Geometry in scene coordinates.
    pub path: BezPath,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint, used when `stroke_width > 0`.
    pub stroke: Brush,
    /// Stroke width.
    pub stroke_width: f64,
    /// Group opacity in `[0, 1]`.
    pub opacity: f64,
}

/// Text content and style.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPayload {
    /// Anchor position.
    pub pos: Point,
    /// Unshaped text.
    pub text: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// CSS-style weight (`400` normal, `700` bold).
    pub font_weight: u16,
    /// Rotation about `pos`, in degrees.
    pub angle: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Fill paint.
    pub fill: Brush,
    /// Group opacity in `[0, 1]`.
    pub opacity: f64,
}

/// The resolved content of a mark.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// Rectangle.
    Rect(RectPayload),
    /// Path.
    Path(PathPayload),
    /// Text.
    Text(TextPayload),
}

impl MarkPayload {
    /// The kind of this payload.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Rect(_) => MarkKind::Rect,
            Self::Path(_) => MarkKind::Path,
            Self::Text(_) => MarkKind::Text,
        }
    }

    /// Geometry bounds, if known without text measurement.
    ///
    /// Text marks return `None`; callers that need text extents must measure them.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(r.rect.abs()),
            Self::Path(p) => {
                if p.path.elements().is_empty() {
                    None
                } else {
                    Some(p.path.bounding_box())
                }
            }
            Self::Text(_) => None,
        }
    }

    /// Group opacity of the payload.
    pub fn opacity(&self) -> f64 {
        match self {
            Self::Rect(r) => r.opacity,
            Self::Path(p) => p.opacity,
            Self::Text(t) => t.opacity,
        }
    }

    /// Whether `pt` lies inside the painted fill area.
    ///
    /// Paths use the non-zero winding rule. Text never hits, and neither do fully transparent
    /// marks.
    pub fn contains(&self, pt: Point) -> bool {
        if self.opacity() <= 0.0 {
            return false;
        }
        match self {
            Self::Rect(r) => !brush_is_transparent(&r.fill) && r.rect.abs().contains(pt),
            Self::Path(p) => !brush_is_transparent(&p.fill) && p.path.contains(pt),
            Self::Text(_) => false,
        }
    }
}

/// Returns `true` if the brush paints nothing.
pub(crate) fn brush_is_transparent(brush: &Brush) -> bool {
    match brush {
        Brush::Solid(color) => color.to_rgba8().a == 0,
        _ => false,
    }
}

/// A stable-identity drawing primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable identity.
    pub id: MarkId,
    /// Primitive kind (always equal to `payload.kind()`).
    pub kind: MarkKind,
    /// Paint order; higher draws later. Ties break on `id`.
    pub z_index: i32,
    /// Resolved content.
    pub payload: MarkPayload,
}

impl Mark {
    /// Starts building a mark. The builder defaults to a rect.
    pub fn builder(id: MarkId) -> MarkBuilder {
        MarkBuilder::new(id)
    }
}

/// Fluent construction of a [`Mark`].
///
/// Setters that do not apply to the selected kind are ignored, so generators can share one
/// styling chain between kinds.
#[derive(Clone, Debug)]
pub struct MarkBuilder {
    id: MarkId,
    kind: MarkKind,
    z_index: i32,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    path: BezPath,
    text: String,
    font_size: f64,
    font_weight: u16,
    angle: f64,
    anchor: TextAnchor,
    baseline: TextBaseline,
    fill: Brush,
    stroke: Brush,
    stroke_width: f64,
    corner_radius: f64,
    opacity: f64,
}

impl MarkBuilder {
    fn new(id: MarkId) -> Self {
        Self {
            id,
            kind: MarkKind::Rect,
            z_index: 0,
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            path: BezPath::new(),
            text: String::new(),
            font_size: 12.0,
            font_weight: 400,
            angle: 0.0,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
            fill: Brush::Solid(Color::BLACK),
            stroke: Brush::Solid(Color::TRANSPARENT),
            stroke_width: 0.0,
            corner_radius: 0.0,
            opacity: 1.0,
        }
    }

    /// Selects a rect mark.
    pub fn rect(mut self) -> Self {
        self.kind = MarkKind::Rect;
        self
    }

    /// Selects a path mark.
    pub fn path(mut self) -> Self {
        self.kind = MarkKind::Path;
        self
    }

    /// Selects a text mark.
    pub fn text(mut self) -> Self {
        self.kind = MarkKind::Text;
        self
    }

    /// Sets the paint order.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets the x position (rect origin or text anchor).
    pub fn x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    /// Sets the y position (rect origin or text anchor).
    pub fn y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    /// Sets the rect width.
    pub fn w(mut self, w: f64) -> Self {
        self.w = w;
        self
    }

    /// Sets the rect height.
    pub fn h(mut self, h: f64) -> Self {
        self.h = h;
        self
    }

    /// Sets rect geometry from a [`Rect`].
    pub fn bounds(self, rect: Rect) -> Self {
        self.x(rect.x0).y(rect.y0).w(rect.width()).h(rect.height())
    }

    /// Sets the path geometry.
    pub fn shape(mut self, path: BezPath) -> Self {
        self.path = path;
        self
    }

    /// Sets the text content.
    pub fn content(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the font size.
    pub fn font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the font weight.
    pub fn font_weight(mut self, weight: u16) -> Self {
        self.font_weight = weight;
        self
    }

    /// Sets the text rotation in degrees.
    pub fn angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Sets the text anchor.
    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the text baseline.
    pub fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the fill paint.
    pub fn fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the stroke paint and width.
    pub fn stroke(mut self, stroke: impl Into<Brush>, width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = width;
        self
    }

    /// Sets the rect corner radius.
    pub fn corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius.max(0.0);
        self
    }

    /// Sets the group opacity, clamped to `[0, 1]`.
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = if opacity.is_nan() {
            1.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        let payload = match self.kind {
            MarkKind::Rect => MarkPayload::Rect(RectPayload {
                rect: Rect::new(self.x, self.y, self.x + self.w, self.y + self.h),
                fill: self.fill,
                stroke: self.stroke,
                stroke_width: self.stroke_width,
                corner_radius: self.corner_radius,
                opacity: self.opacity,
            }),
            MarkKind::Path => MarkPayload::Path(PathPayload {
                path: self.path,
                fill: self.fill,
                stroke: self.stroke,
                stroke_width: self.stroke_width,
                opacity: self.opacity,
            }),
            MarkKind::Text => MarkPayload::Text(TextPayload {
                pos: Point::new(self.x, self.y),
                text: self.text,
                font_size: self.font_size,
                font_weight: self.font_weight,
                angle: self.angle,
                anchor: self.anchor,
                baseline: self.baseline,
                fill: self.fill,
                opacity: self.opacity,
            }),
        };
        Mark {
            id: self.id,
            kind: self.kind,
            z_index: self.z_index,
            payload,
        }
    }
}
