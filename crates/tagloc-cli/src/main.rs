//! tagloc CLI: fit calibrations, inspect them and localise detections.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use tagloc::core::{RawDetection, Resolution};
use tagloc::fit::{fit_manifest, load_manifest, FitConfig};
use tagloc::model::blob::{load_record, save_record};
use tagloc::{Localizer, LocalizerConfig};

#[derive(Debug, Parser)]
#[command(name = "tagloc")]
#[command(author, version, about = "Fiducial marker distance calibration and localisation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fit a calibration from a JSON manifest of calibration photographs.
    Fit {
        /// Path to the calibration manifest (JSON).
        manifest: PathBuf,

        /// Optional path to a JSON FitConfig. Defaults are used if omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the fitted calibration blob here.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a calibration blob as JSON.
    Inspect {
        /// Path to a `.calib` file.
        file: PathBuf,
    },

    /// Turn a JSON array of detections into tokens.
    Locate {
        /// Path to the detections (JSON array).
        detections: PathBuf,

        /// Optional localizer config (JSON) with marker sizes.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory holding `<model>.calib` files. Overrides the config.
        #[arg(long)]
        model_dir: Option<PathBuf>,

        /// Calibration to use. Without it tokens carry pixel geometry only.
        #[arg(long)]
        model: Option<String>,

        /// Image width in pixels.
        #[arg(long)]
        width: u32,

        /// Image height in pixels.
        #[arg(long)]
        height: u32,
    },
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let value = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(value)
}

fn run_fit(manifest: &Path, config: Option<&Path>, output: Option<&Path>) -> Result<String> {
    let manifest = load_manifest(manifest)?;
    let config = match config {
        Some(path) => load_json_file::<FitConfig>(path)?,
        None => FitConfig::default(),
    };
    let report = fit_manifest(&manifest, &config)?;
    if let Some(path) = output {
        save_record(path, &report.record)
            .with_context(|| format!("failed to save calibration to {}", path.display()))?;
        info!("saved calibration to {}", path.display());
    }
    Ok(serde_json::to_string_pretty(&report)?)
}

fn run_inspect(file: &Path) -> Result<String> {
    let record = load_record(file)?;
    Ok(serde_json::to_string_pretty(&record)?)
}

fn run_locate(
    detections: &Path,
    config: Option<&Path>,
    model_dir: Option<&Path>,
    model: Option<&str>,
    resolution: Resolution,
) -> Result<String> {
    let mut config = match config {
        Some(path) => LocalizerConfig::from_file(path)?,
        None => LocalizerConfig::default(),
    };
    if let Some(dir) = model_dir {
        config.model_dir = dir.to_path_buf();
    }
    let detections: Vec<RawDetection> = load_json_file(detections)?;
    let localizer = Localizer::new(&config);
    let tokens = localizer.build_tokens(&detections, resolution, model)?;
    Ok(serde_json::to_string_pretty(&tokens)?)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let json = match &cli.command {
        Command::Fit {
            manifest,
            config,
            output,
        } => run_fit(manifest, config.as_deref(), output.as_deref())?,
        Command::Inspect { file } => run_inspect(file)?,
        Command::Locate {
            detections,
            config,
            model_dir,
            model,
            width,
            height,
        } => run_locate(
            detections,
            config.as_deref(),
            model_dir.as_deref(),
            model.as_deref(),
            Resolution::new(*width, *height),
        )?,
    };
    println!("{json}");
    Ok(())
}
