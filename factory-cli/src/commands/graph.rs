//! Graph command

use anyhow::{Context, Result};
use colored::*;
use factory_core::graph::render::to_svg;
use factory_core::graph::{Inspection, InspectorEntry, NodeKind, Point};
use factory_dashboard::{DashboardAction, DashboardView};

use super::{CliDashboard, load};

/// Print the dependency graph, optionally inspecting a node or exporting SVG
pub async fn show_graph(
    dashboard: &CliDashboard,
    svg: Option<String>,
    click: Option<(f64, f64)>,
) -> Result<()> {
    load(dashboard).await?;

    if let Some((x, y)) = click {
        dashboard
            .dispatch(DashboardAction::CanvasClicked(Point::new(x, y)))
            .await;
    }

    let view = dashboard.view().await;
    print_graph(&view);

    if click.is_some() {
        println!();
        match &view.inspection {
            Some(inspection) => print_inspection(inspection),
            None => println!("{}", "No node at that position.".yellow()),
        }
    }

    if let Some(path) = svg {
        std::fs::write(&path, to_svg(&view.graph))
            .with_context(|| format!("Failed to write SVG file: {}", path))?;
        println!();
        println!("{}", format!("✓ Graph written to {}", path).green().bold());
    }

    Ok(())
}

fn print_graph(view: &DashboardView) {
    let graph = &view.graph;
    if graph.nodes().is_empty() {
        println!("{}", "No modules found.".yellow());
        return;
    }

    println!("{}", format!("Nodes ({}):", graph.nodes().len()).bold());
    for node in graph.nodes() {
        let kind = match node.kind {
            NodeKind::Module => "module".blue(),
            NodeKind::Capability => "capability".green(),
        };
        println!(
            "  {} {:<24} {:<10} {}",
            "▸".cyan(),
            node.name.bold(),
            kind,
            format!("({:.0}, {:.0})", node.position.x, node.position.y).dimmed()
        );
    }

    println!();
    println!("{}", format!("Dependencies ({}):", graph.edges().len()).bold());
    for edge in graph.edges() {
        println!(
            "  {} → {}{}",
            graph.name_of(&edge.from),
            graph.name_of(&edge.to),
            edge.constraint
                .as_ref()
                .map(|c| format!(" ({})", c).dimmed().to_string())
                .unwrap_or_default()
        );
    }
}

fn print_inspection(inspection: &Inspection) {
    let (title, entries) = match inspection {
        Inspection::Module { dependencies, .. } => ("Depends on:", dependencies),
        Inspection::Capability { required_by, .. } => ("Required by:", required_by),
    };

    println!("{}", inspection.name().bold());
    println!("  {}", title);
    if entries.is_empty() {
        println!("    {}", "nothing".dimmed());
    }
    for entry in entries {
        print_entry(entry);
    }
}

fn print_entry(entry: &InspectorEntry) {
    match &entry.constraint {
        Some(constraint) => println!("    - {} {}", entry.name, constraint.dimmed()),
        None => println!("    - {}", entry.name),
    }
}
