use anyhow::Result;
use colored::Colorize;
use declarative::{Action, AutoConfirm, ExecuteOptions, ExecuteSummary, Outcome, execute};

use crate::Context;
use crate::commands::{connect, plan::parse_target, push};
use crate::config::Manifest;
use crate::engine;
use crate::progress::{BarProgress, PromptConfirm};
use crate::ui;

/// Reconcile the manifest in dependency order, optionally pushing after
pub fn run(ctx: &Context, target: Option<&str>, yes: bool, push_after: bool) -> Result<()> {
    let manifest = Manifest::resolve(ctx.config.as_deref())?;
    let plan = manifest.plan()?.filter_by_target(parse_target(target)?.as_ref());

    if plan.is_empty() {
        if ctx.json() {
            return ui::json(&Vec::<Outcome>::new());
        }
        ui::warn("No resources match");
        return Ok(());
    }

    declarative::check(&plan)?;
    let session = connect(ctx, &manifest)?;

    let opts = ExecuteOptions::default();
    let mut progress = BarProgress::new(ctx.interactive());
    let summary = if yes || ctx.json() {
        execute(&plan, &session, &opts, &mut progress, &mut AutoConfirm)?
    } else {
        execute(&plan, &session, &opts, &mut progress, &mut PromptConfirm)?
    };

    let mut outcomes: Vec<Outcome> = summary.outcomes().into_iter().cloned().collect();
    let mut pushed = false;

    if push_after && summary.skipped == 0 {
        if summary.total_changes() == 0 {
            log::info!("Nothing changed, skipping push");
        } else {
            let folders = manifest.push_folders(&plan)?;
            let description = manifest
                .push_description()
                .map_or_else(push::default_description, str::to_string);
            outcomes.push(declarative::push(&session, &folders, &description)?);
            pushed = true;
        }
    }

    if ctx.json() {
        return ui::json(&outcomes);
    }
    report(&summary, pushed);
    Ok(())
}

fn report(summary: &ExecuteSummary, pushed: bool) {
    let changed: Vec<_> = summary
        .entries
        .iter()
        .filter(|e| e.action != Action::NoOp)
        .collect();

    if !changed.is_empty() {
        println!();
        for entry in changed {
            println!(
                "  {} {}.{} {}",
                ui::action_symbol(entry.action),
                entry.kind,
                entry.name,
                entry.folder.as_str().dimmed()
            );
        }
    }

    engine::print_summary(summary);

    if pushed {
        ui::success("Pushed staged changes");
    } else if summary.total_changes() > 0 {
        println!();
        ui::dim("Changes are staged; run `prismactl push` or `apply --push` to make them live.");
    }
}
