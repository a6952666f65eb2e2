use anyhow::Result;
use serde_json::json;

use crate::Context;
use crate::config::Manifest;
use crate::ui;

/// Validate every manifest entry and the plan's references, offline
pub fn run(ctx: &Context) -> Result<()> {
    let manifest = Manifest::resolve(ctx.config.as_deref())?;
    let plan = manifest.plan()?;
    let count = declarative::check(&plan)?;

    if ctx.json() {
        return ui::json(&json!({"changed": false, "data": {"valid": count}}));
    }

    if !ctx.quiet {
        ui::header("Manifest");
        ui::kv("resources", &count.to_string());
        ui::kv("folders", &plan.folders().len().to_string());
        println!();
    }
    ui::success(&format!("{count} resource(s) valid"));
    Ok(())
}
