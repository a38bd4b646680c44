//! Command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::adapters::FFprobeAdapter;
use crate::app::{AppContainer, CutRequest, DefaultAppContainer, FetchRequest};
use crate::cli::args::{CutArgs, FetchArgs, ProbeArgs};
use crate::cli::{Cli, Commands};
use crate::config_initialization::{CliOverrides, Settings};
use crate::domain::model::{CutReport, OutputLayout};
use crate::logging;
use crate::ports::{ProbePort, ProgressPort};

/// Result of a successful command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Clips were produced
    Clips(CutReport),
    /// A source was probed
    Duration(ProbeReport),
}

/// Output of the probe command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeReport {
    pub path: PathBuf,
    pub duration: f64,
}

/// Command-line values that feed the settings hierarchy
pub fn cli_overrides(cli: &Cli) -> CliOverrides {
    let (videos_dir, download_dir) = match &cli.command {
        Commands::Fetch(args) => (args.target.videos_dir.clone(), args.download_dir.clone()),
        Commands::Cut(args) => (args.target.videos_dir.clone(), None),
        Commands::Probe(_) => (None, None),
    };
    CliOverrides {
        config: cli.config.clone(),
        videos_dir,
        download_dir,
        log_level: cli.log_level.clone(),
        log_json: cli.log_json,
    }
}

/// Resolve settings, install logging and run the selected command
pub async fn execute(cli: Cli, progress: Arc<dyn ProgressPort>) -> Result<CommandOutcome> {
    let settings = Settings::resolve(&cli_overrides(&cli))?;
    logging::init_logging(settings.log_level.as_deref(), settings.log_json)?;
    if let Some(path) = &settings.config_file {
        info!("Loaded configuration from: {}", path.display());
    }
    debug!("Resolved settings: {:?}", settings);

    match cli.command {
        Commands::Fetch(args) => fetch(args, &settings, progress).await.map(CommandOutcome::Clips),
        Commands::Cut(args) => cut(args, &settings, progress).await.map(CommandOutcome::Clips),
        Commands::Probe(args) => probe(args).await.map(CommandOutcome::Duration),
    }
}

/// Execute the fetch command
pub async fn fetch(
    args: FetchArgs,
    settings: &Settings,
    progress: Arc<dyn ProgressPort>,
) -> Result<CutReport> {
    let download_root = settings.require_download_dir()?.to_path_buf();
    info!("Fetching {} into category {}", args.url, args.target.category);

    let container = DefaultAppContainer::new(settings.encoder_settings(), progress)?;
    let interactor = container.fetch_interactor()?;
    let report = interactor
        .execute(FetchRequest {
            url: args.url,
            download_root,
            category: args.target.category.clone(),
            clip_length: args.target.duration,
            clips: args.target.clips,
            layout: OutputLayout::new(&settings.videos_dir),
            seed: args.target.seed,
        })
        .await?;

    info!("Produced {} clips", report.count);
    Ok(report)
}

/// Execute the cut command
pub async fn cut(
    args: CutArgs,
    settings: &Settings,
    progress: Arc<dyn ProgressPort>,
) -> Result<CutReport> {
    info!("Cutting {} into category {}", args.input.display(), args.target.category);

    let container = DefaultAppContainer::new(settings.encoder_settings(), progress)?;
    let report = container
        .cut_interactor()
        .execute(CutRequest {
            source: args.input,
            category: args.target.category.clone(),
            clip_length: args.target.duration,
            clips: args.target.clips,
            layout: OutputLayout::new(&settings.videos_dir),
            seed: args.target.seed,
        })
        .await?;

    info!("Produced {} clips", report.count);
    Ok(report)
}

/// Execute the probe command
pub async fn probe(args: ProbeArgs) -> Result<ProbeReport> {
    let adapter = FFprobeAdapter::new()?;
    let duration = adapter
        .probe_duration(&args.input)
        .await
        .with_context(|| format!("Failed to read duration of {}", args.input.display()))?;
    Ok(ProbeReport {
        path: args.input,
        duration,
    })
}
