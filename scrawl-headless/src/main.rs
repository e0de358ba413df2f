//! # Scrawl Headless
//!
//! Replays a script against the canvas and prints a JSON summary.

use clap::Parser;
use scrawl_headless::{CliArgs, HeadlessConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = HeadlessConfig::from(args);

    // Logs go to stderr so stdout stays a clean JSON summary.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scrawl_headless=info,scrawl_core=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting Scrawl headless v{}", scrawl_core::VERSION);
    if let Some(ref script) = config.script {
        tracing::info!("Script: {}", script.display());
    }

    let summary = scrawl_headless::run(&config)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    tracing::info!("Scrawl headless exited");
    Ok(())
}
