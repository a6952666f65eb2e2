use anyhow::{Context as AnyhowContext, Result};
use declarative::{ExecuteOptions, Target, execute_simple};

use crate::Context;
use crate::commands::connect;
use crate::config::Manifest;
use crate::engine;
use crate::ui;

/// Preview what apply would change: list and decide, never mutate
pub fn run(ctx: &Context, target: Option<&str>) -> Result<()> {
    let manifest = Manifest::resolve(ctx.config.as_deref())?;
    let plan = manifest.plan()?.filter_by_target(parse_target(target)?.as_ref());

    if plan.is_empty() {
        if ctx.json() {
            return ui::json(&Vec::<()>::new());
        }
        ui::warn("No resources match");
        return Ok(());
    }

    declarative::check(&plan)?;
    let session = connect(ctx, &manifest)?;
    let summary = execute_simple(&plan, &session, &ExecuteOptions { dry_run: true })?;

    if ctx.json() {
        return ui::json(&summary.entries);
    }
    engine::display_plan(&summary);
    Ok(())
}

pub fn parse_target(target: Option<&str>) -> Result<Option<Target>> {
    target
        .map(|t| {
            t.parse::<Target>()
                .with_context(|| format!("Invalid target '{t}'"))
        })
        .transpose()
}
