//! dropview - Main entry point
//!
//! Imports the startup model and texture, then opens the viewer window.
//! Nothing is shown when the startup assets cannot be loaded.

mod app;
mod backend;
mod overlay;
mod scene;

use anyhow::Result;
use bevy::app::AppExit;
use clap::Parser;
use dropview_core::{config, resources, Config, LoadError, ModelData, TextureData};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::scene::StartupAssets;

#[derive(Parser, Debug)]
#[command(name = "dropview")]
#[command(about = "Drag-and-drop 3D model viewer")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "dropview.toml")]
    config: PathBuf,

    /// Resource directory, instead of searching for one
    #[arg(short, long)]
    resources: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG wins; otherwise keep the GPU stack quiet below our level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},wgpu=error,naga=warn", level)));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("dropview v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load_config(&args.config)?;

    let resource_dir = match args.resources {
        Some(dir) => dir,
        None => resources::resolve_resource_dir(&config.assets.resource_dir),
    };
    info!(path = %resource_dir.display(), "Using resource directory");

    let startup = match load_startup(&config, &resource_dir) {
        Ok(startup) => startup,
        Err(e) => {
            error!(error = %e, "Startup assets could not be loaded");
            return Ok(ExitCode::FAILURE);
        }
    };

    let exit = app::run(&config, startup);

    Ok(match exit {
        AppExit::Success => ExitCode::SUCCESS,
        AppExit::Error(code) => ExitCode::from(code.get()),
    })
}

/// Import the configured model and texture before any window exists
///
/// A model without meshes is rejected here as `LoadError::NoMeshes`.
fn load_startup(config: &Config, resource_dir: &Path) -> Result<StartupAssets, LoadError> {
    let model = ModelData::load(&config.model_path(resource_dir))?;
    info!(
        path = %model.source().display(),
        meshes = model.meshes().len(),
        "Loaded startup model"
    );

    let texture = TextureData::load(&config.texture_path(resource_dir))?;

    Ok(StartupAssets { model, texture })
}
