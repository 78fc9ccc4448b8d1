//! ballot: runs a scripted single-election session from the command line.

mod config;
mod runner;

use anyhow::Context;
use ballot_utils::LogFormat;
use clap::Parser;
use config::ElectionConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ballot", about = "Phase-gated single-election runner")]
struct Cli {
    /// Path to a TOML election script. If omitted, an empty election is run.
    #[arg(long, global = true, env = "BALLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the value from the config file.
    #[arg(long, global = true, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Overrides the value from the config file.
    #[arg(long, global = true, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the script through every phase and print the report as JSON.
    Run {
        /// Print the JSON report on a single line.
        #[arg(long)]
        compact: bool,
    },
    /// Print an example election script.
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let compact = match cli.command {
        Command::Init => {
            print!("{}", ElectionConfig::example().to_toml_string());
            return Ok(());
        }
        Command::Run { compact } => compact,
    };

    let mut config = match &cli.config {
        Some(path) => ElectionConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ElectionConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    ballot_utils::init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded election script from {}", path.display());
    }

    let script = config.validate().context("invalid election script")?;
    tracing::info!(
        voters = script.voters.len(),
        proposals = script.proposals.len(),
        ballots = script.ballots.len(),
        "starting election"
    );

    let report = runner::run(script).await?;
    let json = if compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{json}");

    Ok(())
}
