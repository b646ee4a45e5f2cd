// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curve interpolation for series outlines.
//!
//! The Catmull-Rom variant is parameterized by `alpha` (`0` uniform, `0.5` centripetal,
//! `1` chordal) and emits one cubic per input segment, matching d3-shape's
//! `curveCatmullRom`.

use kurbo::{BezPath, Point};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

const EPSILON: f64 = 1e-12;

/// How consecutive points of a series are joined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    /// Straight segments.
    Linear,
    /// Catmull-Rom spline through every point.
    CatmullRom {
        /// Knot parameterization exponent in `[0, 1]`.
        alpha: f64,
    },
}

impl Default for Curve {
    fn default() -> Self {
        Self::catmull_rom()
    }
}

impl Curve {
    /// A centripetal Catmull-Rom curve (`alpha = 0.5`).
    pub fn catmull_rom() -> Self {
        Self::CatmullRom { alpha: 0.5 }
    }

    /// Appends a curve through `points` to `path`.
    ///
    /// With `connect`, the first point is joined to the current subpath with a straight
    /// line; otherwise a new subpath starts there. Nothing is appended for an empty slice.
    pub fn append(&self, path: &mut BezPath, points: &[Point], connect: bool) {
        let Some(&first) = points.first() else {
            return;
        };
        if connect && !path.elements().is_empty() {
            path.line_to(first);
        } else {
            path.move_to(first);
        }
        match *self {
            Self::Linear => {
                for &p in &points[1..] {
                    path.line_to(p);
                }
            }
            Self::CatmullRom { alpha } => catmull_rom(path, points, alpha.clamp(0.0, 1.0)),
        }
    }
}

/// Emits the segments after `points[0]`; the caller has already moved or lined to it.
fn catmull_rom(path: &mut BezPath, points: &[Point], alpha: f64) {
    match points.len() {
        0 | 1 => return,
        2 => {
            path.line_to(points[1]);
            return;
        }
        _ => {}
    }

    // `l[i]` is the distance between points `i` and `i + 1`, raised to `alpha`.
    let knot = |a: Point, b: Point| {
        let d = (a - b).hypot2();
        d.powf(alpha * 0.5)
    };

    let last = points.len() - 1;
    for i in 0..last {
        let p1 = points[i];
        let p2 = points[i + 1];
        let l12 = knot(p1, p2);

        // Endpoints repeat themselves as the missing neighbour, so the outer control of the
        // first and last segments collapses onto the endpoint.
        let (c1, c2) = if i == 0 {
            let p3 = points[i + 2];
            let l23 = knot(p2, p3);
            (p1, control_end(p1, p2, p3, l12, l23))
        } else if i + 1 == last {
            let p0 = points[i - 1];
            let l01 = knot(p0, p1);
            (control_start(p0, p1, p2, l01, l12), p2)
        } else {
            let p0 = points[i - 1];
            let p3 = points[i + 2];
            let l01 = knot(p0, p1);
            let l23 = knot(p2, p3);
            (control_start(p0, p1, p2, l01, l12), control_end(p1, p2, p3, l12, l23))
        };
        path.curve_to(c1, c2, p2);
    }
}

fn control_start(p0: Point, p1: Point, p2: Point, l01: f64, l12: f64) -> Point {
    if l01 <= EPSILON {
        return p1;
    }
    let (l01_2, l12_2) = (l01 * l01, l12 * l12);
    let a = 2.0 * l01_2 + 3.0 * l01 * l12 + l12_2;
    let n = 3.0 * l01 * (l01 + l12);
    Point::new(
        (p1.x * a - p0.x * l12_2 + p2.x * l01_2) / n,
        (p1.y * a - p0.y * l12_2 + p2.y * l01_2) / n,
    )
}

fn control_end(p1: Point, p2: Point, p3: Point, l12: f64, l23: f64) -> Point {
    if l23 <= EPSILON {
        return p2;
    }
    let (l12_2, l23_2) = (l12 * l12, l23 * l23);
    let b = 2.0 * l23_2 + 3.0 * l23 * l12 + l12_2;
    let m = 3.0 * l23 * (l23 + l12);
    Point::new(
        (p2.x * b + p1.x * l23_2 - p3.x * l12_2) / m,
        (p2.y * b + p1.y * l23_2 - p3.y * l12_2) / m,
    )
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::PathEl;

    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn short_inputs_degrade_to_lines() {
        let mut path = BezPath::new();
        Curve::catmull_rom().append(&mut path, &[], false);
        assert!(path.elements().is_empty());

        Curve::catmull_rom().append(&mut path, &[Point::new(0.0, 0.0)], false);
        assert_eq!(path.elements(), &[PathEl::MoveTo(Point::new(0.0, 0.0))]);

        let mut path = BezPath::new();
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 5.0)];
        Curve::catmull_rom().append(&mut path, &pts, false);
        assert_eq!(
            path.elements(),
            &[PathEl::MoveTo(pts[0]), PathEl::LineTo(pts[1])]
        );
    }

    #[test]
    fn catmull_rom_interpolates_every_point() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 10.0),
        ];
        let mut path = BezPath::new();
        Curve::catmull_rom().append(&mut path, &pts, false);
        let ends: Vec<Point> = path
            .elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::MoveTo(p) | PathEl::CurveTo(_, _, p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(ends, pts.to_vec());
    }

    #[test]
    fn uniform_segments_match_cardinal_tangents() {
        // Evenly spaced points make every knot length equal, so the controls reduce to
        // p1 + (p2 - p0) / 6.
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
        ];
        let mut path = BezPath::new();
        Curve::catmull_rom().append(&mut path, &pts, false);
        let PathEl::CurveTo(c1, c2, _) = path.elements()[2] else {
            panic!("expected a cubic for the middle segment");
        };
        assert!(close(c1, Point::new(1.0 + 2.0 / 6.0, 0.0)));
        assert!(close(c2, Point::new(2.0 - 2.0 / 6.0, 0.0)));

        // The first segment starts with its control at the first point.
        let PathEl::CurveTo(c1, _, _) = path.elements()[1] else {
            panic!("expected a cubic for the first segment");
        };
        assert!(close(c1, pts[0]));
    }

    fn controls(pts: &[Point]) -> Vec<(Point, Point, Point)> {
        let mut path = BezPath::new();
        Curve::catmull_rom().append(&mut path, pts, false);
        path.elements()
            .iter()
            .filter_map(|el| match *el {
                PathEl::CurveTo(c1, c2, p) => Some((c1, c2, p)),
                _ => None,
            })
            .collect()
    }

    fn assert_segments(actual: &[(Point, Point, Point)], expected: &[[(f64, f64); 3]]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (got, want)) in actual.iter().zip(expected).enumerate() {
            let got = [got.0, got.1, got.2];
            for (g, w) in got.iter().zip(want) {
                assert!(close(*g, Point::new(w.0, w.1)), "segment {i}: {g:?} != {w:?}");
            }
        }
    }

    #[test]
    fn three_points_match_d3_controls() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)];
        assert_segments(
            &controls(&pts),
            &[
                [(0.0, 0.0), (2.0 / 3.0, 1.0), (1.0, 1.0)],
                [(4.0 / 3.0, 1.0), (2.0, 0.0), (2.0, 0.0)],
            ],
        );
    }

    #[test]
    fn four_uneven_points_match_d3_controls() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(3.0, 0.0),
            Point::new(4.0, 3.0),
        ];
        assert_segments(
            &controls(&pts),
            &[
                [(0.0, 0.0), (0.544_565_387_227_833_5, 1.926_093_136_679_641), (1.0, 2.0)],
                [
                    (1.512_219_407_367_707_3, 2.083_121_766_920_465_6),
                    (2.504_143_274_110_831_4, -0.117_055_894_410_323_81),
                    (3.0, 0.0),
                ],
                [(3.524_304_652_738_931_7, 0.123_771_538_965_809_34), (4.0, 3.0), (4.0, 3.0)],
            ],
        );
    }

    #[test]
    fn connect_joins_with_a_line() {
        let mut path = BezPath::new();
        let top = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let bottom = [Point::new(10.0, 5.0), Point::new(0.0, 5.0)];
        Curve::Linear.append(&mut path, &top, false);
        Curve::Linear.append(&mut path, &bottom, true);
        assert_eq!(path.elements().len(), 4);
        assert_eq!(path.elements()[2], PathEl::LineTo(bottom[0]));

        // Connecting to an empty path starts a subpath instead.
        let mut path = BezPath::new();
        Curve::Linear.append(&mut path, &bottom, true);
        assert_eq!(path.elements()[0], PathEl::MoveTo(bottom[0]));
    }
}
