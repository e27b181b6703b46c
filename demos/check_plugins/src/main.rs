//! Check Plugins Demo
//!
//! Evaluates a plugins manifest and prints its finalized requests, or the
//! first error with the script and line it was raised at.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package check-plugins -- plugins.toml
//! cargo run --package check-plugins -- plugins.toml --restricted --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use plugreq::core::AllowApplyFalse;
use plugreq::prelude::*;
use plugreq::runtime::logging;
use tracing::{debug, error};

#[derive(Parser)]
#[command(
    name = "check-plugins",
    about = "Evaluate a plugins manifest and print the plugin requests"
)]
struct Cli {
    /// Path to the plugins manifest (TOML with `[[plugins]]` entries).
    manifest: PathBuf,

    /// Refuse `apply = false` declarations.
    #[arg(long)]
    restricted: bool,

    /// Check plugin ids against the full id syntax.
    #[arg(long)]
    strict: bool,

    /// Print the requests (or the error) as JSON.
    #[arg(long)]
    json: bool,

    /// Configuration file; defaults to `plugreq.toml` in the usual places.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.file(path);
    }
    let mut config = loader.load().context("failed to load configuration")?;
    logging::init_from_config(&config.logging);

    if cli.restricted {
        config.collector.allow_apply_false = AllowApplyFalse::Forbidden;
    }
    config.collector.strict_ids |= cli.strict;
    debug!(collector = ?config.collector, "Collector configuration");

    let block = PluginsBlock::from_file(&cli.manifest)?;
    let host = BlockHost::new(&config.collector);

    match host.evaluate(&block) {
        Ok(requests) => {
            if cli.json {
                let report = RequestReport::new(block.script.display_name(), &requests);
                println!("{}", report.to_json_pretty()?);
            } else {
                for request in &requests {
                    println!("{request}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ (RuntimeError::Located(_) | RuntimeError::Request(_))) => {
            error!(error = %err, "Plugins block rejected");
            if cli.json {
                let location = err.location();
                let value = serde_json::json!({
                    "error": err.request_error().map(PluginRequestError::message),
                    "script": location.map(|l| l.script_display_name.as_str()),
                    "line": location.map(|l| l.line_number),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                eprintln!("{err}");
            }
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}
