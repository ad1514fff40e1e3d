//! plotpath: plot straight-line SVG artwork on a pen plotter or cutter.
//!
//! Reads `<path>` and `<rect>` geometry from an SVG file, orders it into
//! pen-down strokes with short pen-up travel, and writes the resulting
//! plotter command script to a file or stdout.
//!
//! # Usage
//!
//! ```text
//! plotpath [OPTIONS] <SVG_IMG>
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr
//! so the script can be piped from stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use plotpath_core::{SequencerConfig, UnitConfig};
use plotpath_plotter::{PlotSummary, PlotterError, PlotterSettings, ScriptPlotter};
use plotpath_svg::SvgError;
use tracing_subscriber::EnvFilter;

/// Plot straight-line SVG artwork on a pen plotter or cutter.
///
/// Every path segment is drawn exactly once; nearby components are
/// chained into one stroke and rectangles are traced three times.
#[derive(Debug, Parser)]
#[command(name = "plotpath", version)]
struct Cli {
    /// Path to the input SVG.
    svg_img: PathBuf,

    /// Write the plotter script here instead of stdout.
    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Largest jump (device steps) that still continues the current stroke.
    #[arg(long, default_value_t = SequencerConfig::DEFAULT_GAP_THRESHOLD)]
    gap_threshold: f64,

    /// Document pixels per inch.
    #[arg(long, default_value_t = UnitConfig::DEFAULT_PIXELS_PER_INCH)]
    pixels_per_inch: f64,

    /// Device steps per inch.
    #[arg(long, default_value_t = UnitConfig::DEFAULT_STEPS_PER_INCH)]
    steps_per_inch: f64,

    /// Media width in inches, the mirror line for x.
    #[arg(long, default_value_t = UnitConfig::DEFAULT_MEDIA_WIDTH_INCHES)]
    media_width: f64,

    /// Do not mirror x about the media width.
    #[arg(long)]
    no_flip: bool,

    /// Tool speed.
    #[arg(long, default_value_t = PlotterSettings::DEFAULT_SPEED)]
    speed: u8,

    /// Blade or pen pressure.
    #[arg(long, default_value_t = PlotterSettings::DEFAULT_PRESSURE)]
    pressure: u8,

    /// Media type code.
    #[arg(long, default_value_t = PlotterSettings::DEFAULT_MEDIA)]
    media: u8,

    /// Blade offset.
    #[arg(long, default_value_t = PlotterSettings::DEFAULT_OFFSET, allow_negative_numbers = true)]
    offset: i16,

    /// Full sequencer config as a JSON string.
    ///
    /// When provided, `--gap-threshold` is ignored. The JSON must be a
    /// valid `SequencerConfig` serialization; missing fields take their
    /// defaults.
    #[arg(long)]
    config_json: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("error parsing --config-json: {0}")]
    Config(#[from] serde_json::Error),

    #[error("error reading {path}: {source}")]
    Svg {
        path: PathBuf,
        #[source]
        source: SvgError,
    },

    #[error("error opening {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Plotter(#[from] PlotterError),
}

fn sequencer_config(cli: &Cli) -> Result<SequencerConfig, AppError> {
    if let Some(ref json) = cli.config_json {
        return Ok(serde_json::from_str(json)?);
    }
    Ok(SequencerConfig {
        gap_threshold: cli.gap_threshold,
        ..SequencerConfig::default()
    })
}

const fn unit_config(cli: &Cli) -> UnitConfig {
    UnitConfig {
        pixels_per_inch: cli.pixels_per_inch,
        steps_per_inch: cli.steps_per_inch,
        media_width_inches: cli.media_width,
        flip_x: !cli.no_flip,
    }
}

const fn plotter_settings(cli: &Cli) -> PlotterSettings {
    PlotterSettings {
        speed: cli.speed,
        pressure: cli.pressure,
        media: cli.media,
        offset: cli.offset,
    }
}

fn open_output(cli: &Cli) -> Result<Box<dyn Write>, AppError> {
    match cli.output_file {
        Some(ref path) => {
            let file = File::create(path).map_err(|source| AppError::Output {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn plot(cli: &Cli) -> Result<PlotSummary, AppError> {
    let config = sequencer_config(cli)?;
    let units = unit_config(cli);
    tracing::debug!(?config, ?units, "configuration");

    let document = plotpath_svg::read_file(&cli.svg_img, &units).map_err(|source| {
        AppError::Svg {
            path: cli.svg_img.clone(),
            source,
        }
    })?;

    let mut plotter = ScriptPlotter::new(open_output(cli)?, plotter_settings(cli))?;
    let summary = plotpath_plotter::run(document, &config, &mut plotter)?;
    plotter.finish()?;
    Ok(summary)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match plot(&cli) {
        Ok(summary) => {
            tracing::info!(
                input = %cli.svg_img.display(),
                strokes = summary.strokes,
                rects = summary.rects,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("plotpath").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_library_defaults() {
        let cli = parse(&["art.svg"]);
        assert_eq!(unit_config(&cli), UnitConfig::default());
        assert_eq!(plotter_settings(&cli), PlotterSettings::default());
        assert_eq!(sequencer_config(&cli).unwrap(), SequencerConfig::default());
        assert!(cli.output_file.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "--gap-threshold",
            "4",
            "--no-flip",
            "--pressure",
            "12",
            "--offset",
            "-18",
            "art.svg",
        ]);
        assert!((sequencer_config(&cli).unwrap().gap_threshold - 4.0).abs() < f64::EPSILON);
        assert!(!unit_config(&cli).flip_x);
        assert_eq!(plotter_settings(&cli).pressure, 12);
        assert_eq!(plotter_settings(&cli).offset, -18);
    }

    #[test]
    fn config_json_wins_over_flags() {
        let cli = parse(&[
            "--gap-threshold",
            "4",
            "--config-json",
            r#"{"gap_threshold": 30.0}"#,
            "art.svg",
        ]);
        let config = sequencer_config(&cli).unwrap();
        assert!((config.gap_threshold - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_config_json_is_reported() {
        let cli = parse(&["--config-json", "{", "art.svg"]);
        let err = sequencer_config(&cli).unwrap_err();
        assert!(err.to_string().starts_with("error parsing --config-json"));
    }

    #[test]
    fn missing_input_is_an_svg_error() {
        let cli = parse(&["/nonexistent/plotpath/input.svg"]);
        let err = plot(&cli).unwrap_err();
        assert!(matches!(err, AppError::Svg { source: SvgError::Io(_), .. }));
    }

    #[test]
    fn svg_image_is_required() {
        assert!(Cli::try_parse_from(["plotpath"]).is_err());
    }
}
