//! Air drawing application: capture hand strokes against reference formulas.

use air_ink::{
    app::AirDrawApp,
    catalog::SourceCatalog,
    config::Config,
    inkml::{format_trace, read_trace_file},
    tracker::ReplayTracker,
};
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Reference document to start with
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Replay recorded landmark frames (YAML) instead of using the camera
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Camera index to use
    #[arg(long)]
    cam: Option<i32>,

    /// Directory exported documents are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the traces of an exported document and exit
    #[arg(long)]
    inspect: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Air drawing capture");

    if let Some(path) = &args.inspect {
        return inspect(path);
    }

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(cam) = args.cam {
        config.capture.camera_index = cam;
    }
    if let Some(output_dir) = args.output_dir {
        config.paths.output_dir = output_dir;
    }
    config.validate().context("invalid configuration")?;

    let catalog = build_catalog(&config, args.source.as_deref())?;

    if let Some(recording) = &args.replay {
        let tracker = ReplayTracker::from_file(recording)?;
        let mut app = AirDrawApp::new(config, catalog, tracker)?;
        app.run()?;

        if app.machine().store().has_strokes() {
            let path = app.save()?;
            println!("{}", path.display());
        } else {
            info!("Replay produced no strokes, nothing to save");
        }
        return Ok(());
    }

    run_interactive(config, catalog)
}

#[cfg(feature = "vision")]
fn run_interactive(config: Config, catalog: SourceCatalog) -> Result<()> {
    air_ink::display::run_camera(config, catalog)?;
    Ok(())
}

#[cfg(not(feature = "vision"))]
fn run_interactive(_config: Config, _catalog: SourceCatalog) -> Result<()> {
    anyhow::bail!("built without the `vision` feature; use --replay <recording.yaml>")
}

/// Catalog of the data directory, positioned on `source` when given
fn build_catalog(config: &Config, source: Option<&Path>) -> Result<SourceCatalog> {
    let Some(source) = source else {
        return SourceCatalog::scan(&config.paths.data_dir)
            .with_context(|| format!("no reference documents in {}", config.paths.data_dir.display()));
    };

    let from_data_dir = SourceCatalog::scan(&config.paths.data_dir).and_then(|mut catalog| {
        catalog.select(source)?;
        Ok(catalog)
    });
    match from_data_dir {
        Ok(catalog) => Ok(catalog),
        Err(_) => Ok(SourceCatalog::from_files(vec![source.to_path_buf()])?),
    }
}

/// Log every trace of an exported document
fn inspect(path: &Path) -> Result<()> {
    let traces = read_trace_file(path).with_context(|| format!("failed to read {}", path.display()))?;
    if traces.is_empty() {
        warn!("No valid strokes in {}", path.display());
        return Ok(());
    }

    for trace in &traces {
        println!("trace {} ({} points): {}", trace.id, trace.points.len(), format_trace(&trace.points));
    }
    info!("{} strokes in {}", traces.len(), path.display());
    Ok(())
}
