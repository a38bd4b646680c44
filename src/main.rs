//! bgclip
//!
//! Cuts random background clips from a downloaded or local video.
//!
//! # Usage
//!
//! ```bash
//! bgclip fetch --url "https://www.youtube.com/watch?v=..." \
//!     --category minecraft --duration 30 --clips 5
//! bgclip cut --input source.webm --category minecraft --duration 60
//! bgclip probe --input source.webm
//! ```
//!
//! Progress is reported as one JSON object per line on stdout; logs go to
//! stderr.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;

use bgclip_cli::cli::commands::{self, CommandOutcome};
use bgclip_cli::cli::Cli;
use bgclip_cli::output::JsonProgressWriter;
use bgclip_cli::ports::ProgressPort;

/// Main entry point for the bgclip CLI application
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let progress = Arc::new(JsonProgressWriter::stdout());

    match commands::execute(cli, Arc::clone(&progress) as Arc<dyn ProgressPort>).await {
        Ok(CommandOutcome::Clips(report)) => {
            progress.done(&report);
            ExitCode::SUCCESS
        }
        Ok(CommandOutcome::Duration(report)) => match serde_json::to_string(&report) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                progress.error(&e.to_string());
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            let message = format!("{:#}", e);
            error!("{}", message);
            progress.error(&message);
            ExitCode::FAILURE
        }
    }
}
