// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for guide layout.
//!
//! Guides need rough text extents before any shaping happens (axis thickness, legend
//! bounds). Shaping stays downstream, so chart code depends on this small interface and
//! renderers can plug in real metrics.

/// A minimal text measurement interface used by guide generators.
pub trait TextMeasurer {
    /// Measures a single line of text.
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics;
}

/// Text styling inputs relevant to measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in scene units.
    pub font_size: f64,
    /// CSS-style weight (`400` normal, `700` bold).
    pub font_weight: u16,
}

impl TextStyle {
    /// Creates a normal-weight style with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_weight: 400,
        }
    }

    /// Sets the font weight.
    #[must_use]
    pub fn with_weight(mut self, font_weight: u16) -> Self {
        self.font_weight = font_weight;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// The advance width.
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
    /// Additional line spacing beyond ascent+descent.
    pub leading: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent + leading`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }
}

/// A heuristic text measurer for demos and early layout.
///
/// It assumes an average glyph advance of 0.6em (0.66em when bold) and a baseline at 0.8em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
        let em = if style.font_weight >= 600 { 0.66 } else { 0.6 };
        TextMetrics {
            advance_width: em * style.font_size * text.chars().count() as f64,
            ascent: 0.8 * style.font_size,
            descent: 0.2 * style.font_size,
            leading: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_metrics_scale_with_font_size() {
        let m = HeuristicTextMeasurer.measure("GPT-4", TextStyle::new(10.0));
        assert_eq!(m.advance_width, 30.0);
        assert_eq!(m.line_height(), 10.0);

        let bold = HeuristicTextMeasurer.measure("GPT-4", TextStyle::new(10.0).with_weight(700));
        assert!(bold.advance_width > m.advance_width);
    }
}
