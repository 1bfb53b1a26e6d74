//! Guardrails command

use anyhow::{Context, Result};
use colored::*;
use factory_core::guardrail::GuardrailSummary;

use super::{CliDashboard, load};
use crate::id_resolver::resolve_transaction_id;
use crate::output::{badge, short_id};

/// Print the guardrail breakdown of one run
pub async fn show_guardrails(dashboard: &CliDashboard, id: &str, json: bool) -> Result<()> {
    let snapshot = load(dashboard).await?;
    let id = resolve_transaction_id(&snapshot, id)?;
    let summary = GuardrailSummary::from_lines(snapshot.lines(&id));

    if json {
        let out = serde_json::json!({
            "transaction_id": id,
            "overall": summary.overall,
            "badge": summary.badge(),
            "results": summary.results,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("Failed to serialize guardrails")?
        );
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Guardrails for run".bold(),
        short_id(&id).cyan(),
        badge(summary.overall)
    );

    if summary.results.is_empty() {
        println!("  {}", "No violations reported.".green());
        return Ok(());
    }

    for result in &summary.results {
        println!("  {} {}", badge(result.severity), result.category);
    }

    Ok(())
}
