// src/main.rs

use lightcone_slab::{CellSnapshot, Config, NearestResampler, SlabPipeline};

use anyhow::{bail, Context}; // For context on Results
use log::{error, info};
use std::io::Write;
use std::path::PathBuf;

const USAGE: &str = "usage: lightcone-slab <config.json> <snapshot.json> [output.json]";

/// Main entry point: builds one slab from a config and a snapshot file.
fn main() {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    if let Err(e) = run() {
        error!("{:#}. Root cause: {:?}", e, e.root_cause());
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        bail!(USAGE);
    }
    let config_path = PathBuf::from(&args[0]);
    let snapshot_path = PathBuf::from(&args[1]);
    let output_path = args.get(2).map(PathBuf::from);

    // --- Configuration ---
    let config = Config::load(&config_path)?;
    info!("Configuration loaded from {}.", config_path.display());

    let snapshot = CellSnapshot::load(&snapshot_path)?;
    info!(
        "Snapshot '{}' loaded: {} cells.",
        snapshot.identifier,
        snapshot.cells.len()
    );

    let resampler = NearestResampler::new();
    let pipeline = SlabPipeline::new(&snapshot, &resampler);
    let output = pipeline.run(&config).context("Failed to build slab")?;

    let json = serde_json::to_string(&output).context("Failed to serialize output image")?;
    match output_path {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}x{} image to {}.", config.pixels, config.pixels, path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(json.as_bytes()).context("Failed to write to stdout")?;
            handle.write_all(b"\n").context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
