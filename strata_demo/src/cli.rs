// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kurbo::Point;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Render the streamgraph to an SVG file.
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// Where to write the SVG.
        #[arg(short, long)]
        output: PathBuf,

        /// Simulate the pointer at `X,Y` (view coordinates) to show a hovered layer and
        /// its tooltip.
        #[arg(long, value_name = "X,Y", value_parser = parse_point)]
        hover: Option<Point>,
    },
    /// Write an HTML report: the chart, then one hovered snapshot per series.
    Report {
        #[command(flatten)]
        source: SourceArgs,

        /// Where to write the HTML.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the default configuration as JSON.
    Config {
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub(crate) struct SourceArgs {
    /// CSV with a `Date` (or `date`) column and one column per series.
    #[arg(short, long, required_unless_present = "sample")]
    pub(crate) input: Option<PathBuf>,

    /// Use the bundled LLM usage sample instead of `--input`.
    #[arg(long, conflicts_with = "input")]
    pub(crate) sample: bool,

    /// JSON chart configuration; every field is optional.
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,
}

pub(crate) fn parse_point(text: &str) -> Result<Point, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected `X,Y`, got `{text}`"))?;
    let coord = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("`{s}` is not a coordinate"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn points_parse_from_pairs() {
        assert_eq!(parse_point("12.5, 40"), Ok(Point::new(12.5, 40.0)));
        assert!(parse_point("12").is_err());
        assert!(parse_point("a,b").is_err());
        assert!(parse_point("1,inf").is_err());
    }

    #[test]
    fn sample_and_input_are_exclusive() {
        assert!(Cli::try_parse_from(["strata_demo", "render", "-o", "a.svg"]).is_err());
        let both = ["strata_demo", "render", "--sample", "-i", "x.csv", "-o", "a.svg"];
        assert!(Cli::try_parse_from(both).is_err());
        let cli = Cli::try_parse_from([
            "strata_demo",
            "render",
            "--sample",
            "-o",
            "a.svg",
            "--hover",
            "235,280",
        ])
        .unwrap();
        let Commands::Render { source, hover, .. } = cli.command else {
            panic!("render command");
        };
        assert!(source.sample);
        assert_eq!(hover, Some(Point::new(235.0, 280.0)));
    }
}
