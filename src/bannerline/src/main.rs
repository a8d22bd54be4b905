//! Bannerline — promotional banner visibility engine.
//!
//! CLI entry point that drives the banner state machine against a
//! file-backed store, so banner behavior can be inspected and scripted
//! outside a host UI.

use anyhow::Context;
use banner_core::{BannerConfig, Campaign};
use banner_engine::{BannerMachine, SystemClock};
use banner_store::FileStore;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "bannerline")]
#[command(about = "Promotional banner visibility engine")]
#[command(version)]
struct Cli {
    /// Campaign deadline (RFC 3339, e.g. 2026-09-01T00:00:00Z)
    #[arg(long, env = "BANNERLINE__DEADLINE")]
    deadline: DateTime<Utc>,

    /// Campaign name used in logs
    #[arg(long, default_value = "default-campaign")]
    name: String,

    /// State file path (overrides config)
    #[arg(long, env = "BANNERLINE__STORE__PATH")]
    state_file: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate visibility and print the result
    Status,
    /// Dismiss the banner for the configured window
    Dismiss,
    /// Clear all dismissal state
    Reset,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bannerline=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = BannerConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        BannerConfig::default()
    });

    // Apply CLI overrides
    if let Some(path) = cli.state_file {
        config.store.path = path;
    }
    config.validate()?;

    let store = FileStore::new(config.store.path.as_str());
    let campaign = Campaign::new(cli.name, cli.deadline);
    let mut machine = BannerMachine::new(campaign, config, store, SystemClock);

    let evaluation = match cli.command {
        Command::Status => machine.status(),
        Command::Dismiss => {
            machine.dismiss();
            machine.status()
        }
        Command::Reset => {
            machine.reset();
            machine.status()
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&evaluation).context("serializing evaluation")?
    );

    Ok(())
}
