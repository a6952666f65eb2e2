use anyhow::Result;
use colored::Colorize;
use declarative::Inventory;
use sasekit::ResourceKind;

use crate::Context;
use crate::commands::connect;
use crate::config::{Manifest, parse_folder};
use crate::ui;

/// List objects of one kind in one folder
pub fn run(ctx: &Context, kind: &str, folder: &str) -> Result<()> {
    let kind: ResourceKind = kind.parse()?;
    let folder = parse_folder(folder)?;

    let manifest = Manifest::resolve(ctx.config.as_deref())?;
    let session = connect(ctx, &manifest)?;
    let inventory = Inventory::fetch(&session, kind, folder)?;

    if ctx.json() {
        let raw: Vec<&serde_json::Value> = inventory.objects().iter().map(|o| &o.raw).collect();
        return ui::json(&raw);
    }

    ui::section(&format!("{} in {}", kind.display_name(), folder));
    if inventory.is_empty() {
        ui::dim("(none)");
        return Ok(());
    }
    for object in inventory.objects() {
        println!("  {:<40} {}", object.name, object.id.dimmed());
    }
    println!();
    ui::dim(&format!("{} object(s)", inventory.len()));
    Ok(())
}
