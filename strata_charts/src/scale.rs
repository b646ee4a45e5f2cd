// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales mapping data values into scene coordinates.
//!
//! Tick generation and band layout follow d3-scale, so charts line up with the browser
//! renderings people compare them against.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use strata_core::{ColId, TableData};

use crate::time;

const E10: f64 = 7.071_067_811_865_476;
const E5: f64 = 3.162_277_660_168_379_5;
const E2: f64 = core::f64::consts::SQRT_2;

/// A scale specification (domain + options, no range yet).
#[derive(Clone, Debug)]
pub enum ScaleSpec {
    /// Continuous linear scale.
    Linear(ScaleLinearSpec),
    /// Continuous time scale over epoch milliseconds.
    Time(ScaleTimeSpec),
    /// Discrete band scale over string labels.
    Band(ScaleBandSpec),
}

impl From<ScaleLinearSpec> for ScaleSpec {
    fn from(value: ScaleLinearSpec) -> Self {
        Self::Linear(value)
    }
}

impl From<ScaleTimeSpec> for ScaleSpec {
    fn from(value: ScaleTimeSpec) -> Self {
        Self::Time(value)
    }
}

impl From<ScaleBandSpec> for ScaleSpec {
    fn from(value: ScaleBandSpec) -> Self {
        Self::Band(value)
    }
}

/// A continuous scale instance.
#[derive(Clone, Copy, Debug)]
pub enum ScaleContinuous {
    /// Linear scale.
    Linear(ScaleLinear),
    /// Time scale.
    Time(ScaleTime),
}

impl ScaleContinuous {
    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        match self {
            Self::Linear(s) => s.map(x),
            Self::Time(s) => s.map(x),
        }
    }
}

impl From<ScaleLinear> for ScaleContinuous {
    fn from(value: ScaleLinear) -> Self {
        Self::Linear(value)
    }
}

impl From<ScaleTime> for ScaleContinuous {
    fn from(value: ScaleTime) -> Self {
        Self::Time(value)
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    ///
    /// A degenerate domain maps everything to the middle of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return (r0 + r1) * 0.5;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// The domain this scale maps from.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The range this scale maps to.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns roughly `count` round tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    /// Returns the spacing between the values [`ScaleLinear::ticks`] produces.
    pub fn tick_step(&self, count: usize) -> f64 {
        tick_step(self.domain.0, self.domain.1, count)
    }
}

/// Specification for a linear scale (domain + options, no range yet).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinearSpec {
    /// Domain in data units.
    pub domain: (f64, f64),
    /// Whether to extend the domain to round tick values.
    pub nice: bool,
    /// Tick count used when extending the domain.
    pub nice_count: usize,
}

impl ScaleLinearSpec {
    /// Creates a new linear scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            nice: false,
            nice_count: 10,
        }
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Sets the tick count the nice domain is computed for.
    pub fn with_nice_count(mut self, count: usize) -> Self {
        self.nice_count = count;
        self
    }

    /// Returns the effective domain after applying `nice` (if enabled).
    pub fn resolved_domain(&self) -> (f64, f64) {
        if self.nice {
            nice_domain(self.domain, self.nice_count)
        } else {
            self.domain
        }
    }

    /// Instantiates a concrete scale using the authored domain.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleLinear {
        ScaleLinear::new(self.domain, range)
    }

    /// Instantiates a concrete scale using the `resolved_domain` (respecting `nice`).
    pub fn instantiate_resolved(&self, range: (f64, f64)) -> ScaleLinear {
        ScaleLinear::new(self.resolved_domain(), range)
    }
}

/// Tick indices and increment for a domain.
///
/// A negative `inc` means ticks are `i / -inc`, which keeps decimal ticks exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (i1, i2, inc) = if power < 0.0 {
        let inv = 10_f64.powf(-power) / factor;
        let mut i1 = (start * inv).round();
        let mut i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        (i1, i2, -inv)
    } else {
        let inc = 10_f64.powf(power) * factor;
        let mut i1 = (start / inc).round();
        let mut i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        (i1, i2, inc)
    };
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64).2
}

fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let (lo, hi) = if stop < start {
        (stop, start)
    } else {
        (start, stop)
    };
    let inc = tick_increment(lo, hi, count);
    if inc < 0.0 { -1.0 / inc } else { inc }
}

fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return alloc::vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse {
        (stop, start)
    } else {
        (start, stop)
    };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if i1.is_nan() || i2.is_nan() || i2 < i1 {
        return Vec::new();
    }
    let n = (i2 - i1 + 1.0).min(10_000.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "positive, integral and capped at 10k"
    )]
    let n = n as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Extends `domain` outward to round values, iterating until the tick step settles.
fn nice_domain(domain: (f64, f64), count: usize) -> (f64, f64) {
    let (mut start, mut stop) = domain;
    let reverse = stop < start;
    if reverse {
        core::mem::swap(&mut start, &mut stop);
    }
    let mut prestep = f64::NAN;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if step == prestep {
            return if reverse { (stop, start) } else { (start, stop) };
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        prestep = step;
    }
    domain
}

/// A linear scale over epoch milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    linear: ScaleLinear,
    tick_every_months: u32,
}

impl ScaleTime {
    /// Creates a time scale mapping a millisecond `domain` to `range`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            linear: ScaleLinear::new(domain, range),
            tick_every_months: 1,
        }
    }

    /// Sets the month interval between ticks.
    pub fn with_tick_every_months(mut self, every: u32) -> Self {
        self.tick_every_months = every.max(1);
        self
    }

    /// Maps a timestamp into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.linear.map(t)
    }

    /// The millisecond domain.
    pub fn domain(&self) -> (f64, f64) {
        self.linear.domain()
    }

    /// Month-start ticks inside the domain.
    pub fn ticks(&self) -> Vec<f64> {
        let (d0, d1) = self.linear.domain();
        time::month_ticks(d0, d1, self.tick_every_months)
    }
}

/// Specification for a time scale (millisecond domain, no range yet).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTimeSpec {
    /// Domain in epoch milliseconds.
    pub domain: (f64, f64),
    /// Month interval between ticks.
    pub tick_every_months: u32,
}

impl ScaleTimeSpec {
    /// Creates a time scale spec with one tick per month.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            tick_every_months: 1,
        }
    }

    /// Sets the month interval between ticks.
    pub fn with_tick_every_months(mut self, every: u32) -> Self {
        self.tick_every_months = every.max(1);
        self
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleTime {
        ScaleTime::new(self.domain, range).with_tick_every_months(self.tick_every_months)
    }
}

/// A discrete band scale over string labels.
///
/// Duplicate labels collapse onto the band of their first appearance.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBand {
    labels: Vec<String>,
    start: f64,
    step: f64,
    band_width: f64,
    reverse: bool,
}

impl ScaleBand {
    /// Creates a band scale over `labels` with no padding and centered alignment.
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>, range: (f64, f64)) -> Self {
        ScaleBandSpec::new(labels).instantiate(range)
    }

    fn layout(
        labels: Vec<String>,
        range: (f64, f64),
        padding_inner: f64,
        padding_outer: f64,
        align: f64,
    ) -> Self {
        let (r0, r1) = range;
        let reverse = r1 < r0;
        let (mut start, stop) = if reverse { (r1, r0) } else { (r0, r1) };
        let n = labels.len() as f64;
        let step = (stop - start) / (n - padding_inner + padding_outer * 2.0).max(1.0);
        start += (stop - start - step * (n - padding_inner)) * align;
        Self {
            labels,
            start,
            step,
            band_width: step * (1.0 - padding_inner),
            reverse,
        }
    }

    /// The distinct labels, in band order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.labels.len()
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        self.band_width
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Returns the band index for `label`, if it is in the domain.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Returns the start of the band at `index`.
    pub fn x_index(&self, index: usize) -> f64 {
        let i = if self.reverse {
            self.labels.len().saturating_sub(1 + index)
        } else {
            index
        };
        self.start + self.step * i as f64
    }

    /// Returns the start of the band for `label`, if it is in the domain.
    pub fn x(&self, label: &str) -> Option<f64> {
        self.index_of(label).map(|i| self.x_index(i))
    }
}

/// Specification for a band scale (labels + padding, no range yet).
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBandSpec {
    /// Distinct labels in first-appearance order.
    pub labels: Vec<String>,
    /// Inner padding as a fraction of the step, in `[0, 1]`.
    pub padding_inner: f64,
    /// Outer padding as a fraction of the step.
    pub padding_outer: f64,
    /// Where leftover space goes: `0` packs bands at the start, `1` at the end.
    pub align: f64,
}

impl ScaleBandSpec {
    /// Creates a band spec, dropping repeated labels.
    pub fn new(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut distinct: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !distinct.contains(&label) {
                distinct.push(label);
            }
        }
        Self {
            labels: distinct,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
        }
    }

    /// Sets inner and outer padding to the same value.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.padding_outer = padding.max(0.0);
        self
    }

    /// Sets the alignment, clamped to `[0, 1]`.
    pub fn with_align(mut self, align: f64) -> Self {
        self.align = align.clamp(0.0, 1.0);
        self
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleBand {
        ScaleBand::layout(
            self.labels.clone(),
            range,
            self.padding_inner,
            self.padding_outer,
            self.align,
        )
    }
}

/// Infer a `(min, max)` domain for a numeric column.
///
/// Non-finite values are ignored. Returns `None` if no finite values are present.
pub fn infer_domain_f64(data: &dyn TableData, col: ColId) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for row in 0..data.row_count() {
        let Some(v) = data.f64(row, col) else {
            continue;
        };
        if !v.is_finite() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }
    (min.is_finite() && max.is_finite()).then_some((min, max))
}
