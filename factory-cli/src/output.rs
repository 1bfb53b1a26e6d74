//! Terminal formatting helpers

use colored::{ColoredString, Colorize};
use factory_core::domain::guardrail::Severity;
use factory_core::domain::transaction::StageStatus;

/// Colored guardrail badge
pub fn badge(severity: Severity) -> ColoredString {
    let label = format!("[{}]", severity.label());
    match severity {
        Severity::Ok => label.green().bold(),
        Severity::Info => label.cyan().bold(),
        Severity::Warn => label.yellow().bold(),
        Severity::Error => label.red().bold(),
    }
}

/// Colorize stage status for display
pub fn colorize_status(status: StageStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        StageStatus::Pending => status_str.dimmed(),
        StageStatus::Running => status_str.cyan(),
        StageStatus::Passed => status_str.green(),
        StageStatus::Failed => status_str.red(),
        StageStatus::Blocked => status_str.yellow(),
    }
}

/// Fraction in [0, 1] as a percentage
pub fn percent(fraction: Option<f64>) -> String {
    fraction
        .map(|f| format!("{:.1}%", f * 100.0))
        .unwrap_or_else(|| "-".to_string())
}

pub fn duration_ms(ms: Option<f64>) -> String {
    match ms {
        Some(ms) if ms >= 1000.0 => format!("{:.1}s", ms / 1000.0),
        Some(ms) => format!("{:.0}ms", ms),
        None => "-".to_string(),
    }
}

/// First eight characters of an id
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
