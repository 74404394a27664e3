//! resizer-cli: run the resizer session and export routine on a file.
//!
//! Loads an image, applies the same dimension and option handlers the
//! web UI uses, and writes the exported file. Useful for checking export
//! output outside the browser and for scripting batch conversions.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin resizer-cli -- [OPTIONS] <INPUT>
//! ```
//!
//! Log verbosity is controlled by `RUST_LOG` (default `warn`).

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use resizer_core::{
    Dimensions, ExportConfig, ExportSizing, ExportedImage, OutputFormat, Quality, ResizeUnit,
    Session, UploadOutcome,
};
use serde::Serialize;

/// Resize, filter, and re-encode an image.
///
/// Without `--honor-dimensions` the export is drawn on the fixed
/// 500x500 surface, exactly like the web page's default.
#[derive(Parser, Debug)]
#[command(name = "resizer-cli", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP, GIF).
    input: PathBuf,

    /// Target width. With the aspect lock on, the height follows.
    #[arg(long, allow_negative_numbers = true)]
    width: Option<i64>,

    /// Target height, applied after `--width`. With the aspect lock on,
    /// the width follows.
    #[arg(long, allow_negative_numbers = true)]
    height: Option<i64>,

    /// Unit of `--width` and `--height`.
    #[arg(long, value_enum, default_value_t = Unit::Pixels)]
    unit: Unit,

    /// Turn the aspect-ratio lock off.
    #[arg(long)]
    no_lock: bool,

    /// Encoder quality, 1-100 (JPEG and WebP). Out-of-range values are clamped.
    #[arg(long, default_value_t = i64::from(Quality::DEFAULT.get()), allow_negative_numbers = true)]
    quality: i64,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Jpeg)]
    format: Format,

    /// Color filter baked into the export.
    #[arg(long, value_enum, default_value_t = FilterArg::None)]
    filter: FilterArg,

    /// Export at the chosen width and height instead of the fixed surface.
    #[arg(long)]
    honor_dimensions: bool,

    /// Output path. Defaults to `resized-image.<ext>` in the current
    /// directory.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print an export summary as JSON on stdout.
    #[arg(long)]
    json: bool,
}

/// Output format selection.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Lossy JPEG.
    #[value(alias = "jpg")]
    Jpeg,
    /// Lossless PNG.
    Png,
    /// Lossy WebP.
    Webp,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Jpeg => Self::Jpeg,
            Format::Png => Self::Png,
            Format::Webp => Self::WebP,
        }
    }
}

/// Filter selection.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterArg {
    /// No filter.
    None,
    /// Grayscale.
    Grayscale,
    /// Sepia tone.
    Sepia,
}

impl From<FilterArg> for resizer_core::Filter {
    fn from(f: FilterArg) -> Self {
        match f {
            FilterArg::None => Self::None,
            FilterArg::Grayscale => Self::Grayscale,
            FilterArg::Sepia => Self::Sepia,
        }
    }
}

/// Dimension unit selection.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Unit {
    /// Absolute pixels.
    #[value(alias = "px")]
    Pixels,
    /// Percent of the original size.
    #[value(alias = "percent")]
    Percentage,
}

impl From<Unit> for ResizeUnit {
    fn from(u: Unit) -> Self {
        match u {
            Unit::Pixels => Self::Pixels,
            Unit::Percentage => Self::Percentage,
        }
    }
}

/// Export summary printed by `--json`.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    input: &'a Path,
    output: &'a Path,
    original: Option<Dimensions>,
    dimensions: Dimensions,
    format: OutputFormat,
    quality: Quality,
    filter: resizer_core::Filter,
    sizing: ExportSizing,
    bytes: usize,
}

/// Load `bytes` into a new session and apply the CLI options through the
/// session's handlers, in the order a user would set them in the page.
fn session_from_cli(cli: &Cli, name: &str, bytes: Vec<u8>) -> anyhow::Result<Session> {
    let mut session = Session::new();
    session.set_resize_unit(cli.unit.into());

    match session.load(name, bytes) {
        UploadOutcome::Loaded(dimensions) => {
            tracing::debug!(%dimensions, "loaded");
        }
        UploadOutcome::Failed(message) => bail!(message),
        UploadOutcome::Stale => bail!("upload was superseded"),
    }

    if cli.no_lock {
        session.toggle_aspect_ratio_lock();
    }
    if let Some(width) = cli.width {
        session.set_width(width);
    }
    if let Some(height) = cli.height {
        session.set_height(height);
    }
    session.set_quality(cli.quality);
    session.set_format(cli.format.into());
    session.set_filter(cli.filter.into());

    Ok(session)
}

const fn export_config(cli: &Cli) -> ExportConfig {
    ExportConfig {
        sizing: if cli.honor_dimensions {
            ExportSizing::Requested
        } else {
            ExportSizing::Fixed
        },
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let name = cli
        .input
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());

    let session = session_from_cli(cli, &name, bytes)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    let config = export_config(cli);
    let exported: ExportedImage =
        resizer_core::export(&session, &config).context("exporting image")?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&exported.file_name));
    std::fs::write(&output, &exported.bytes)
        .with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(output = %output.display(), bytes = exported.bytes.len(), "written");

    if cli.json {
        let summary = Summary {
            input: &cli.input,
            output: &output,
            original: session.original(),
            dimensions: exported.dimensions,
            format: exported.format,
            quality: session.quality(),
            filter: session.filter(),
            sizing: config.sizing,
            bytes: exported.bytes.len(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        eprintln!(
            "{} -> {} ({}, {} bytes)",
            cli.input.display(),
            output.display(),
            exported.dimensions,
            exported.bytes.len(),
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
