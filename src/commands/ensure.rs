use anyhow::{Context as AnyhowContext, Result, bail};
use declarative::{Descriptor, reconcile, validate};
use sasekit::ResourceKind;
use serde_json::{Map, Value};

use crate::Context;
use crate::cli::EnsureArgs;
use crate::commands::connect;
use crate::config::{Manifest, parse_folder, parse_state};
use crate::engine;
use crate::ui;

/// Reconcile one resource described on the command line
pub fn run(ctx: &Context, args: &EnsureArgs) -> Result<()> {
    let kind: ResourceKind = args.kind.parse()?;
    let folder = parse_folder(&args.folder)?;
    let ensure = parse_state(Some(&args.state))?;

    let fields = build_fields(&args.name, &args.set)?;
    let descriptor = Descriptor::from_fields(kind, fields)
        .with_context(|| format!("Invalid fields for {}", kind.display_name()))?;
    let validated = validate(folder, &descriptor)?;

    let manifest = Manifest::resolve(ctx.config.as_deref())?;
    let session = connect(ctx, &manifest)?;
    let outcome = reconcile(&session, &validated, ensure)?;

    if ctx.json() {
        return ui::json(&outcome);
    }
    engine::display_outcome(&format!("{kind}.{}", args.name), &outcome);
    Ok(())
}

/// Build a descriptor's fields from `key=value` assignments
///
/// Dotted keys nest (`auto_key.ipsec_crypto_profile=p`). Values are parsed
/// as JSON when they can be, and kept as strings otherwise, so
/// `tag=["a","b"]` is a list and `fqdn=a.example` a string.
pub fn build_fields(name: &str, assignments: &[String]) -> Result<Value> {
    let mut root = Map::new();
    root.insert("name".to_string(), Value::String(name.to_string()));

    for assignment in assignments {
        let Some((key, raw)) = assignment.split_once('=') else {
            bail!("Expected KEY=VALUE, got '{assignment}'");
        };
        if key.is_empty() || key.split('.').any(str::is_empty) {
            bail!("Invalid key in '{assignment}'");
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        insert_path(&mut root, key, value)
            .with_context(|| format!("Cannot set '{key}'"))?;
    }

    Ok(Value::Object(root))
}

fn insert_path(root: &mut Map<String, Value>, key: &str, value: Value) -> Result<()> {
    let mut parts: Vec<&str> = key.split('.').collect();
    let Some(last) = parts.pop() else {
        bail!("empty key");
    };

    let mut current = root;
    for part in parts {
        let entry = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match entry {
            Value::Object(map) => map,
            _ => bail!("'{part}' already holds a value"),
        };
    }
    current.insert(last.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_build_fields_nests_and_parses() {
        let fields = build_fields(
            "t1",
            &strings(&[
                r#"auto_key.ike_gateway=[{"name":"gw1"}]"#,
                "auto_key.ipsec_crypto_profile=PaloAlto-Networks-IPSec-Crypto",
                "anti_replay=true",
            ]),
        )
        .unwrap();

        assert_eq!(
            fields,
            json!({
                "name": "t1",
                "auto_key": {
                    "ike_gateway": [{"name": "gw1"}],
                    "ipsec_crypto_profile": "PaloAlto-Networks-IPSec-Crypto"
                },
                "anti_replay": true
            })
        );
    }

    #[test]
    fn test_build_fields_plain_strings() {
        let fields = build_fields("a", &strings(&["ip_netmask=100.10.254.0/24"])).unwrap();
        assert_eq!(fields["ip_netmask"], "100.10.254.0/24");
        let descriptor = Descriptor::from_fields(ResourceKind::Address, fields).unwrap();
        assert_eq!(descriptor.name(), "a");
    }

    #[test]
    fn test_build_fields_rejects_malformed() {
        assert!(build_fields("a", &strings(&["fqdn"])).is_err());
        assert!(build_fields("a", &strings(&["=x"])).is_err());
        assert!(build_fields("a", &strings(&["peer_id..id=x"])).is_err());
        assert!(build_fields("a", &strings(&["region=x", "region.sub=y"])).is_err());
    }
}
