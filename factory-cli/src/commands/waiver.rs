//! Waiver command

use anyhow::{Result, anyhow};
use colored::*;
use factory_dashboard::DashboardAction;

use super::{CliDashboard, load};
use crate::id_resolver::resolve_transaction_id;
use crate::output::short_id;

/// Record a waiver for one policy on one run
pub async fn create_waiver(
    dashboard: &CliDashboard,
    id: &str,
    policy: String,
    reason: String,
) -> Result<()> {
    let snapshot = load(dashboard).await?;
    let id = resolve_transaction_id(&snapshot, id)?;

    let violation = snapshot
        .lines(&id)
        .iter()
        .flat_map(|line| &line.metadata.violations)
        .find(|v| v.policy == policy);
    match violation {
        None => println!(
            "{}",
            format!("Note: run {} reports no `{}` violation.", short_id(&id), policy).yellow()
        ),
        Some(v) if !v.waivable => println!(
            "{}",
            format!("Note: `{}` is not marked waivable on this run.", policy).yellow()
        ),
        Some(_) => {}
    }

    dashboard
        .dispatch(DashboardAction::OpenWaiver {
            transaction_id: id.clone(),
            policy: policy.clone(),
        })
        .await;
    dashboard
        .dispatch(DashboardAction::EditWaiverReason(reason))
        .await;

    match dashboard.submit_waiver().await {
        Ok(()) => {
            println!("{}", "✓ Waiver created successfully!".green().bold());
            println!("  Run:    {}", id.cyan());
            println!("  Policy: {}", policy.bold());
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗ Waiver was not created".red().bold());
            println!("  {}", e.to_string().red());
            Err(anyhow!(e))
        }
    }
}
