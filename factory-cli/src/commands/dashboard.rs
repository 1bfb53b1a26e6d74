//! Dashboard command
//!
//! KPI cards, the closed-period advisory and the runs table with guardrail
//! badges; expanded rows show their detail lines.

use anyhow::Result;
use colored::*;
use factory_core::domain::transaction::PipelineTransactionLine;
use factory_dashboard::{DashboardAction, DashboardView, TransactionRow};

use super::CliDashboard;
use crate::id_resolver::resolve_transaction_id;
use crate::output::{badge, colorize_status, duration_ms, percent, short_id};

/// Fetch and print the dashboard
pub async fn show_dashboard(dashboard: &CliDashboard, expand: &[String]) -> Result<()> {
    dashboard.refresh().await;

    if let Some(snapshot) = dashboard.state().await.snapshot {
        for input in expand {
            let id = resolve_transaction_id(&snapshot, input)?;
            if !dashboard.dispatch(DashboardAction::ToggleRow(id.clone())).await {
                println!(
                    "{}",
                    format!("Run {} has no detail lines to expand.", short_id(&id)).yellow()
                );
            }
        }
    }

    let view = dashboard.view().await;
    if let Some(error) = &view.error {
        println!("{}", "✗ Failed to load the Factory dashboard".red().bold());
        println!("  {}", error.red());
        println!("  Retry with: {}", "factory dashboard".cyan());
        anyhow::bail!("dashboard data unavailable");
    }

    print_view(&view);
    Ok(())
}

fn print_view(view: &DashboardView) {
    println!(
        "{} {}",
        "Factory Pipeline".bold(),
        format!("(channel: {})", view.channel).dimmed()
    );
    println!();

    if let Some(banner) = view.banner {
        println!("{} {}", "⚠".yellow(), banner.yellow());
        println!();
    }

    let kpis = &view.kpis;
    println!("{}", "KPIs:".bold());
    println!("  Runs:          {}", kpis.total_runs.to_string().cyan());
    println!(
        "  Passed/Failed: {} / {} ({} blocked, {} running)",
        kpis.passed.to_string().green(),
        kpis.failed.to_string().red(),
        kpis.blocked.to_string().yellow(),
        kpis.running
    );
    println!(
        "  Pass rate:     {}",
        kpis.pass_rate
            .map(|rate| format!("{:.1}%", rate))
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  Coverage:      {}", percent(kpis.average_coverage));
    println!("  Avg duration:  {}", duration_ms(kpis.average_duration_ms));
    println!("  AI confidence: {}", percent(kpis.average_ai_confidence));
    println!("  Modules:       {}", kpis.module_count);
    println!();

    if view.rows.is_empty() {
        println!("{}", "No pipeline runs found.".yellow());
        return;
    }

    println!("{}", format!("Found {} run(s):", view.rows.len()).bold());
    println!();
    for row in &view.rows {
        print_row(row);
    }
}

fn print_row(row: &TransactionRow) {
    let txn = &row.transaction;
    let marker = match (row.expandable(), row.expanded) {
        (false, _) => " ".normal(),
        (true, false) => "▸".cyan(),
        (true, true) => "▾".cyan(),
    };

    println!(
        "  {} {} {:<8} {:<8} {} {}",
        marker,
        short_id(&txn.id).dimmed(),
        txn.stage().unwrap_or("-"),
        colorize_status(txn.status),
        txn.transaction_date
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed(),
        badge(row.guardrails.overall)
    );

    if !row.expanded {
        return;
    }

    for result in &row.guardrails.results {
        println!("      {} {}", badge(result.severity), result.category);
    }
    for line in &row.lines {
        print_line(line);
    }
    println!();
}

fn print_line(line: &PipelineTransactionLine) {
    let meta = &line.metadata;
    let status = meta
        .status
        .map(|s| colorize_status(s).to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "      #{} {} {} coverage {} in {}",
        line.line_number,
        line.line_type.bold(),
        status,
        percent(meta.coverage),
        duration_ms(meta.duration_ms.map(|ms| ms as f64))
    );
    for violation in &meta.violations {
        println!(
            "        {} {}: {}{}",
            badge(violation.severity),
            violation.policy.cyan(),
            violation.message,
            if violation.waivable {
                " (waivable)".dimmed().to_string()
            } else {
                String::new()
            }
        );
    }
    for (name, url) in &meta.artifacts {
        println!("        {} {} {}", "↳".dimmed(), name, url.underline());
    }
}
