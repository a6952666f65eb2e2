//! Manifest loading
//!
//! ```toml
//! [provider]
//! client_id = "svc@1234567.iam.panserviceaccount.com"
//! client_secret = "${PRISMACTL_CLIENT_SECRET}"
//! tsg_id = "1234567"
//!
//! [[resource]]
//! kind = "address"
//! folder = "Service Connections"
//! name = "Ansible Test"
//! description = "Ansible test address"
//! ip_netmask = "100.10.254.0/24"
//!
//! [push]
//! folders = ["Service Connections"]
//! description = "release"
//! ```

use crate::cli::ProviderArgs;
use crate::paths;
use anyhow::{Context, Result, anyhow};
use declarative::{Descriptor, Ensure, ExecutionPlan, ManifestEntry};
use sasekit::{Credentials, Folder, ResourceKind, SessionConfig};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Parsed manifest file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default, rename = "resource")]
    pub resources: Vec<RawResource>,
    #[serde(default)]
    pub push: Option<PushConfig>,
}

/// `[provider]` - how to reach and authenticate against the API
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub tsg_id: Option<String>,
    pub token_url: Option<String>,
    pub api_base: Option<String>,
    pub settle_delay_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
}

/// One `[[resource]]` table before it is typed
#[derive(Debug, Clone, Deserialize)]
pub struct RawResource {
    pub kind: String,
    pub folder: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// `[push]` - what `apply --push` commits
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushConfig {
    #[serde(default)]
    pub folders: Vec<String>,
    pub description: Option<String>,
}

impl Manifest {
    /// Load a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the manifest named on the command line, or the default one
    ///
    /// A missing default manifest is treated as empty so that commands which
    /// only need credentials work from flags and environment alone.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let path = paths::manifest_path(explicit)?;
        if explicit.is_none() && !path.exists() {
            log::debug!("No manifest at {}, using an empty one", path.display());
            return Ok(Self::default());
        }
        log::debug!("Loading manifest {}", path.display());
        Self::load(&path)
    }

    /// Type every `[[resource]]` into an execution plan
    pub fn plan(&self) -> Result<ExecutionPlan> {
        let mut plan = ExecutionPlan::new();
        for (index, raw) in self.resources.iter().enumerate() {
            let entry = raw
                .to_entry()
                .with_context(|| format!("resource #{} ({})", index + 1, raw.label()))?;
            plan.add(entry);
        }
        Ok(plan)
    }

    /// Folders to push: `[push] folders`, else every folder in the plan
    pub fn push_folders(&self, plan: &ExecutionPlan) -> Result<Vec<Folder>> {
        match &self.push {
            Some(push) if !push.folders.is_empty() => push
                .folders
                .iter()
                .map(|f| parse_folder(f))
                .collect(),
            _ => Ok(plan.folders()),
        }
    }

    pub fn push_description(&self) -> Option<&str> {
        self.push.as_ref().and_then(|p| p.description.as_deref())
    }
}

impl RawResource {
    fn label(&self) -> String {
        match self.fields.get("name").and_then(Value::as_str) {
            Some(name) => format!("{}.{}", self.kind, name),
            None => self.kind.clone(),
        }
    }

    pub fn to_entry(&self) -> Result<ManifestEntry> {
        let kind: ResourceKind = self.kind.parse()?;
        let folder = parse_folder(&self.folder)?;
        let ensure = parse_state(self.state.as_deref())?;
        let descriptor = Descriptor::from_fields(kind, Value::Object(self.fields.clone()))
            .with_context(|| format!("Invalid fields for {}", kind.display_name()))?;
        Ok(ManifestEntry::new(folder, ensure, descriptor))
    }
}

impl ProviderConfig {
    /// Build the session configuration, letting flags and environment win
    pub fn session_config(&self, overrides: &ProviderArgs) -> Result<SessionConfig> {
        let pick = |flag: &Option<String>, file: &Option<String>| {
            flag.clone()
                .or_else(|| file.as_deref().map(paths::expand_str))
                .unwrap_or_default()
        };

        let credentials = Credentials::new(
            pick(&overrides.client_id, &self.client_id),
            pick(&overrides.client_secret, &self.client_secret),
            pick(&overrides.tsg_id, &self.tsg_id),
        );
        credentials.validate()?;

        let mut config = SessionConfig::new(credentials);
        if let Some(url) = &self.token_url {
            config = config.token_url(paths::expand_str(url));
        }
        if let Some(url) = &self.api_base {
            config = config.api_base(paths::expand_str(url));
        }
        if let Some(ms) = self.settle_delay_ms {
            config = config.settle_delay(Duration::from_millis(ms));
        }
        if let Some(secs) = self.timeout_secs {
            config = config.timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

pub fn parse_folder(value: &str) -> Result<Folder> {
    Ok(value.parse()?)
}

pub fn parse_state(value: Option<&str>) -> Result<Ensure> {
    match value {
        None => Ok(Ensure::Present),
        Some(s) => s.parse().map_err(|e: String| anyhow!(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MANIFEST: &str = r#"
[provider]
client_id = "svc@1234567.iam.panserviceaccount.com"
client_secret = "s3cret"
tsg_id = "1234567"
settle_delay_ms = 0

[[resource]]
kind = "ipsec_tunnel"
folder = "Remote Networks"
name = "t1"
auto_key = { ike_gateway = [{ name = "gw1" }], ipsec_crypto_profile = "p" }

[[resource]]
kind = "ike_gateway"
folder = "Remote Networks"
name = "gw1"
peer_id = { id = "198.51.100.7", type = "ipaddr" }
authentication = { pre_shared_key = "k" }
peer_address = { ip = "198.51.100.7" }

[[resource]]
kind = "tag"
folder = "Shared"
state = "absent"
name = "legacy"
"#;

    fn write_manifest(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_plan() {
        let file = write_manifest(MANIFEST);
        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.resources.len(), 3);

        let plan = manifest.plan().unwrap();
        let labels: Vec<String> = plan.ordered().iter().map(|e| e.label()).collect();
        assert_eq!(labels, vec!["tag.legacy", "ike_gateway.gw1", "ipsec_tunnel.t1"]);
        assert_eq!(plan.entries[2].ensure, Ensure::Absent);
    }

    #[test]
    fn test_push_folders_default_to_plan() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        let plan = manifest.plan().unwrap();
        assert_eq!(
            manifest.push_folders(&plan).unwrap(),
            vec![Folder::RemoteNetworks, Folder::Shared]
        );
    }

    #[test]
    fn test_push_folders_from_manifest() {
        let manifest = Manifest::parse(
            r#"
[push]
folders = ["Service Connections"]
description = "release"
"#,
        )
        .unwrap();
        let plan = manifest.plan().unwrap();
        assert_eq!(
            manifest.push_folders(&plan).unwrap(),
            vec![Folder::ServiceConnections]
        );
        assert_eq!(manifest.push_description(), Some("release"));
    }

    #[test]
    fn test_unknown_folder_rejected() {
        let manifest = Manifest::parse(
            r#"
[[resource]]
kind = "tag"
folder = "shared"
name = "t"
"#,
        )
        .unwrap();
        let err = manifest.plan().unwrap_err();
        assert!(format!("{err:#}").contains("unknown folder 'shared'"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let manifest = Manifest::parse(
            r#"
[[resource]]
kind = "address"
folder = "Shared"
name = "a"
fqdn = "a.example"
colour = "red"
"#,
        )
        .unwrap();
        let err = manifest.plan().unwrap_err();
        assert!(format!("{err:#}").contains("address.a"));
    }

    #[test]
    fn test_bad_state_rejected() {
        assert!(parse_state(Some("gone")).is_err());
        assert_eq!(parse_state(None).unwrap(), Ensure::Present);
        assert_eq!(parse_state(Some("absent")).unwrap(), Ensure::Absent);
    }

    #[test]
    fn test_session_config_precedence() {
        let provider = Manifest::parse(MANIFEST).unwrap().provider;
        let overrides = ProviderArgs {
            client_secret: Some("from-flag".into()),
            ..Default::default()
        };
        let config = provider.session_config(&overrides).unwrap();
        assert_eq!(config.credentials.client_secret, "from-flag");
        assert_eq!(config.credentials.tsg_id, "1234567");
        assert_eq!(config.settle_delay, Duration::ZERO);
    }

    #[test]
    fn test_session_config_requires_credentials() {
        let err = ProviderConfig::default()
            .session_config(&ProviderArgs::default())
            .unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_missing_explicit_manifest_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Manifest::resolve(Some(&missing)).is_err());
    }
}
