//! CLI module for bgclip
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod args;
pub mod commands;

pub use args::{CutArgs, FetchArgs, ProbeArgs};

/// bgclip - background clip harvester
///
/// Downloads a source video, trims 10 seconds from each end and cuts random
/// fixed-length clips into `{videos_dir}/{category}/{duration}/bg_NNN.mp4`,
/// encoding with VAAPI when available and libx264 otherwise.
#[derive(Parser, Debug)]
#[command(name = "bgclip")]
#[command(about = "Cut random background clips from a source video")]
#[command(version)]
pub struct Cli {
    /// Logging level or filter directive (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (default: ./bgclip.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a video and cut clips from it
    Fetch(FetchArgs),
    /// Cut clips from a local video file
    Cut(CutArgs),
    /// Print the duration of a local video file
    Probe(ProbeArgs),
}
