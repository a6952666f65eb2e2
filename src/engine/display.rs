//! Plan and outcome display - prismactl-specific UI

use colored::Colorize;
use declarative::{Action, EntryReport, ExecuteSummary, Outcome, OutcomeData};
use sasekit::ResourceKind;

use crate::ui;

/// Entries grouped by kind, kinds in first-seen order
fn group_by_kind(entries: &[EntryReport]) -> Vec<(ResourceKind, Vec<&EntryReport>)> {
    let mut groups: Vec<(ResourceKind, Vec<&EntryReport>)> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|(kind, _)| *kind == entry.kind) {
            Some((_, list)) => list.push(entry),
            None => groups.push((entry.kind, vec![entry])),
        }
    }
    groups
}

/// Display a dry-run summary in a user-friendly format
pub fn display_plan(summary: &ExecuteSummary) {
    if summary.total_changes() == 0 {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Reconciliation Plan".bold()
    );
    println!("│");

    for (kind, entries) in group_by_kind(&summary.entries) {
        println!("│ {}", kind.display_name().bold());
        for entry in entries {
            let state_desc = match entry.action {
                Action::Create => "(will create)",
                Action::Delete => "(will delete)",
                Action::NoOp => "(up to date)",
            };
            println!(
                "│   {} {:<30} {} {}",
                ui::action_symbol(entry.action),
                entry.name,
                entry.folder.as_str().dimmed(),
                state_desc.dimmed()
            );
        }
        println!("│");
    }

    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} to create, {} to delete, {} unchanged",
        summary.created.to_string().green(),
        summary.removed.to_string().red(),
        summary.unchanged.to_string().dimmed()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

/// Print final summary
pub fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.skipped > 0 {
        println!("  {} Aborted", "✗".red());
        println!("    • {} changes skipped", summary.skipped);
        return;
    }

    if summary.total_changes() == 0 {
        println!("  {} Everything up to date", "✓".green().bold());
    } else {
        println!(
            "  {} Configuration staged successfully!",
            "✓".green().bold()
        );
    }

    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.removed > 0 {
        println!("    • {} resources removed", summary.removed);
    }
    if summary.unchanged > 0 {
        println!("    • {} resources unchanged", summary.unchanged);
    }
}

/// Short description of an outcome's data
pub fn describe(outcome: &Outcome) -> String {
    match &outcome.data {
        OutcomeData::Message(message) => message.clone(),
        OutcomeData::Json(value) => {
            let field = |key: &str| value.get(key).and_then(|v| v.as_str());
            match (field("id"), field("job_id")) {
                (Some(id), _) => format!("id {id}"),
                (None, Some(job)) => format!("job {job}"),
                (None, None) => String::new(),
            }
        }
    }
}

/// Display the result of a single reconciliation or push
pub fn display_outcome(label: &str, outcome: &Outcome) {
    let detail = describe(outcome);
    if outcome.changed {
        ui::success(&format!("{label} changed"));
    } else {
        ui::info(&format!("{label} unchanged"));
    }
    if !detail.is_empty() {
        ui::dim(&detail);
    }
}
