// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON chart configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};
use strata_charts::{Curve, Margins, SeriesSpec, Size, StreamgraphSpec};
use strata_transforms::StackOffset;

/// Everything the renderer reads from a config file. Absent fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ChartConfig {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) margins: MarginsConfig,
    /// Stacking order; also the CSV columns that are read.
    pub(crate) series: Vec<SeriesConfig>,
    pub(crate) caption: String,
    pub(crate) offset: OffsetConfig,
    pub(crate) curve: CurveConfig,
    pub(crate) layer_opacity: f64,
    pub(crate) hover_opacity: f64,
    pub(crate) y_padding: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct MarginsConfig {
    pub(crate) top: f64,
    pub(crate) right: f64,
    pub(crate) bottom: f64,
    pub(crate) left: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SeriesConfig {
    pub(crate) key: String,
    /// Any CSS color string.
    pub(crate) color: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OffsetConfig {
    Zero,
    Center,
    Normalize,
    #[default]
    Wiggle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum CurveConfig {
    Linear,
    #[default]
    CatmullRom,
}

const DEFAULT_SERIES: [(&str, &str); 5] = [
    ("GPT-4", "#e41a1c"),
    ("Gemini", "#377eb8"),
    ("PaLM-2", "#4daf4a"),
    ("Claude", "#984ea3"),
    ("LLaMA-3.1", "#ff7f00"),
];

impl Default for ChartConfig {
    fn default() -> Self {
        let defaults = StreamgraphSpec::new(Vec::new());
        Self {
            width: defaults.view_size.width,
            height: defaults.view_size.height,
            margins: defaults.margins.into(),
            series: DEFAULT_SERIES
                .iter()
                .map(|(key, color)| SeriesConfig {
                    key: (*key).to_string(),
                    color: (*color).to_string(),
                })
                .collect(),
            caption: defaults.caption,
            offset: OffsetConfig::default(),
            curve: CurveConfig::default(),
            layer_opacity: defaults.layer_opacity,
            hover_opacity: defaults.hover_opacity,
            y_padding: defaults.y_padding,
        }
    }
}

impl Default for MarginsConfig {
    fn default() -> Self {
        StreamgraphSpec::new(Vec::new()).margins.into()
    }
}

impl From<Margins> for MarginsConfig {
    fn from(m: Margins) -> Self {
        Self {
            top: m.top,
            right: m.right,
            bottom: m.bottom,
            left: m.left,
        }
    }
}

impl From<OffsetConfig> for StackOffset {
    fn from(offset: OffsetConfig) -> Self {
        match offset {
            OffsetConfig::Zero => Self::Zero,
            OffsetConfig::Center => Self::Center,
            OffsetConfig::Normalize => Self::Normalize,
            OffsetConfig::Wiggle => Self::Wiggle,
        }
    }
}

impl From<CurveConfig> for Curve {
    fn from(curve: CurveConfig) -> Self {
        match curve {
            CurveConfig::Linear => Self::Linear,
            CurveConfig::CatmullRom => Self::default(),
        }
    }
}

impl ChartConfig {
    /// Reads a config file, or the defaults when `path` is `None`.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Series keys, in stacking order.
    pub(crate) fn keys(&self) -> Vec<String> {
        self.series.iter().map(|s| s.key.clone()).collect()
    }

    /// The chart spec this config describes.
    pub(crate) fn spec(&self) -> Result<StreamgraphSpec> {
        if self.series.is_empty() {
            return Err(anyhow!("config lists no series"));
        }
        let series = self
            .series
            .iter()
            .map(|s| -> Result<SeriesSpec> {
                Ok(SeriesSpec::new(s.key.as_str(), parse_css_color(&s.color)?))
            })
            .collect::<Result<Vec<_>>>()?;
        let m = self.margins;
        Ok(StreamgraphSpec::new(series)
            .with_view_size(Size::new(self.width, self.height))
            .with_margins(Margins::new(m.top, m.right, m.bottom, m.left))
            .with_offset(self.offset.into())
            .with_curve(self.curve.into())
            .with_opacities(self.layer_opacity, self.hover_opacity)
            .with_caption(self.caption.as_str())
            .with_y_padding(self.y_padding))
    }
}

fn parse_css_color(text: &str) -> Result<Color> {
    parse_color(text)
        .map(|c| c.to_alpha_color::<Srgb>())
        .map_err(|e| anyhow!("invalid color {text:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_llm_chart() {
        let config = ChartConfig::default();
        assert_eq!((config.width, config.height), (600.0, 500.0));
        assert_eq!(config.margins.right, 180.0);
        assert_eq!(
            config.keys(),
            ["GPT-4", "Gemini", "PaLM-2", "Claude", "LLaMA-3.1"]
        );
        assert_eq!(config.caption, "Time (Month / Year)");
        assert_eq!(config.offset, OffsetConfig::Wiggle);

        let spec = config.spec().unwrap();
        let rgb = |c: Color| {
            let c = c.to_rgba8();
            (c.r, c.g, c.b, c.a)
        };
        assert_eq!(rgb(spec.series[0].fill), (0xe4, 0x1a, 0x1c, 0xff));
        assert_eq!(rgb(spec.series[4].fill), (0xff, 0x7f, 0x00, 0xff));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ChartConfig = serde_json::from_str(
            r#"{ "width": 800, "offset": "zero", "series": [{ "key": "A", "color": "teal" }] }"#,
        )
        .unwrap();
        assert_eq!(config.width, 800.0);
        assert_eq!(config.height, 500.0);
        assert_eq!(config.curve, CurveConfig::CatmullRom);
        let spec = config.spec().unwrap();
        assert_eq!(spec.offset, StackOffset::Zero);
        assert_eq!(spec.series.len(), 1);
    }

    #[test]
    fn bad_configs_are_rejected() {
        assert!(serde_json::from_str::<ChartConfig>(r#"{ "colour": "red" }"#).is_err());
        let config = ChartConfig {
            series: vec![SeriesConfig {
                key: "A".into(),
                color: "not a color".into(),
            }],
            ..ChartConfig::default()
        };
        assert!(config.spec().is_err());
        let empty = ChartConfig {
            series: Vec::new(),
            ..ChartConfig::default()
        };
        assert!(empty.spec().is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ChartConfig::default();
        let text = serde_json::to_string_pretty(&config).unwrap();
        assert!(text.contains("\"catmull-rom\""));
        assert_eq!(serde_json::from_str::<ChartConfig>(&text).unwrap(), config);
    }
}
