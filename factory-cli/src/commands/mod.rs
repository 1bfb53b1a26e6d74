//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod dashboard;
mod graph;
mod guardrails;
mod waiver;

use anyhow::{Result, anyhow};
use clap::Subcommand;
use factory_core::domain::filter::{Channel, FactoryFilters};
use factory_dashboard::{Dashboard, UniversalSource};

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show KPI cards and pipeline runs with their guardrail verdicts
    Dashboard {
        /// Release channel: all, beta, stable or LTS
        #[arg(short, long, default_value = "all")]
        channel: Channel,

        /// Only runs of this module
        #[arg(short, long)]
        module: Option<String>,

        /// Transaction IDs (or prefixes) whose detail lines to show
        #[arg(short, long, value_delimiter = ',')]
        expand: Vec<String>,
    },
    /// Show the guardrail breakdown of one pipeline run
    Guardrails {
        /// Transaction ID or unambiguous prefix
        id: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the module dependency graph
    Graph {
        /// Write the rendered graph to this SVG file
        #[arg(long)]
        svg: Option<String>,

        /// Inspect the node at canvas coordinates X,Y
        #[arg(long, value_parser = parse_point)]
        click: Option<(f64, f64)>,
    },
    /// Waive a guardrail policy for one pipeline run
    Waiver {
        /// Transaction ID or unambiguous prefix
        id: String,

        /// Policy to waive
        #[arg(short, long)]
        policy: String,

        /// Why the violation is acceptable
        #[arg(short, long)]
        reason: String,
    },
}

/// Parse canvas coordinates given as `X,Y`
fn parse_point(s: &str) -> Result<(f64, f64)> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("invalid X,Y: no `,` found in `{}`", s))?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Dashboard {
            channel,
            module,
            expand,
        } => {
            let filters = FactoryFilters {
                channel,
                module_id: module,
            };
            dashboard::show_dashboard(&connect(config, filters)?, &expand).await
        }
        Commands::Guardrails { id, json } => {
            guardrails::show_guardrails(&connect(config, FactoryFilters::default())?, &id, json)
                .await
        }
        Commands::Graph { svg, click } => {
            graph::show_graph(&connect(config, FactoryFilters::default())?, svg, click).await
        }
        Commands::Waiver { id, policy, reason } => {
            waiver::create_waiver(
                &connect(config, FactoryFilters::default())?,
                &id,
                policy,
                reason,
            )
            .await
        }
    }
}

type CliDashboard = Dashboard<UniversalSource>;

fn connect(config: &Config, filters: FactoryFilters) -> Result<CliDashboard> {
    Ok(Dashboard::new(UniversalSource::new(config.client()?), filters))
}

/// Refresh and fail the command if the fetch failed
async fn load(dashboard: &CliDashboard) -> Result<factory_dashboard::FactorySnapshot> {
    dashboard.refresh().await;
    let state = dashboard.state().await;
    if let Some(error) = state.error {
        return Err(anyhow!("Failed to load dashboard data: {}", error));
    }
    state
        .snapshot
        .ok_or_else(|| anyhow!("Dashboard data is not available"))
}
