use anyhow::Result;
use chrono::{SecondsFormat, Utc};

use crate::Context;
use crate::commands::connect;
use crate::config::{Manifest, parse_folder};
use crate::engine;
use crate::ui;

/// Description used when none is given
pub fn default_description() -> String {
    format!(
        "prismactl push {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Push the candidate configuration of the given folders as one version
pub fn run(ctx: &Context, folders: &[String], description: Option<&str>) -> Result<()> {
    let folders = folders
        .iter()
        .map(|f| parse_folder(f))
        .collect::<Result<Vec<_>>>()?;
    let description = description.map_or_else(default_description, str::to_string);

    let manifest = Manifest::resolve(ctx.config.as_deref())?;
    let session = connect(ctx, &manifest)?;
    let outcome = declarative::push(&session, &folders, &description)?;

    if ctx.json() {
        return ui::json(&outcome);
    }
    let names: Vec<&str> = folders.iter().map(|f| f.as_str()).collect();
    engine::display_outcome(&format!("push {}", names.join(", ")), &outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_description_is_timestamped() {
        let description = default_description();
        let stamp = description
            .strip_prefix("prismactl push ")
            .expect("prefix");
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }
}
