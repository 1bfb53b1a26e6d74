//! Factory CLI
//!
//! Terminal front-end for the Factory pipeline dashboard.

mod commands;
mod config;
mod id_resolver;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "factory")]
#[command(about = "Factory pipeline dashboard CLI", long_about = None)]
struct Cli {
    /// Universal API base URL
    #[arg(long, env = "FACTORY_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "FACTORY_REQUEST_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "factory_cli=info,factory_dashboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        request_timeout: Duration::from_secs(cli.timeout),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
