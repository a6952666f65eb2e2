//! Execution planner - orders manifest entries along the reference graph

use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use crate::types::Ensure;
use sasekit::{Folder, ResourceKind};
use std::fmt;
use std::str::FromStr;

/// One declared resource: where it lives, whether it should exist, and what it is
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    pub folder: Folder,
    pub ensure: Ensure,
    pub descriptor: Descriptor,
}

impl ManifestEntry {
    pub fn new(folder: Folder, ensure: Ensure, descriptor: Descriptor) -> Self {
        Self {
            folder,
            ensure,
            descriptor,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.descriptor.kind()
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Label used in progress output, e.g. `ike_gateway.gw-1`
    pub fn label(&self) -> String {
        format!("{}.{}", self.kind(), self.name())
    }
}

/// An execution plan over manifest entries
///
/// Entries keep manifest order; [`ExecutionPlan::ordered`] gives the order
/// they are reconciled in.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    pub entries: Vec<ManifestEntry>,
}

impl ExecutionPlan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    /// Entries in reconciliation order
    ///
    /// Removals come first, dependents before what they depend on. Creations
    /// follow, dependencies before their dependents. Manifest order is kept
    /// within a rank.
    pub fn ordered(&self) -> Vec<&ManifestEntry> {
        let mut absent: Vec<&ManifestEntry> =
            self.entries.iter().filter(|e| e.ensure.is_absent()).collect();
        let mut present: Vec<&ManifestEntry> =
            self.entries.iter().filter(|e| e.ensure.is_present()).collect();

        absent.sort_by_key(|e| std::cmp::Reverse(e.kind().dependency_rank()));
        present.sort_by_key(|e| e.kind().dependency_rank());

        absent.extend(present);
        absent
    }

    /// Reject present entries that reference something the plan removes
    pub fn check_references(&self) -> Result<()> {
        for entry in self.entries.iter().filter(|e| e.ensure.is_present()) {
            for reference in entry.descriptor.references() {
                let removed = self.entries.iter().any(|other| {
                    other.ensure.is_absent()
                        && other.folder == entry.folder
                        && other.kind() == reference.kind
                        && other.name() == reference.name
                });
                if removed {
                    return Err(Error::Dependency {
                        kind: entry.kind(),
                        name: entry.name().to_string(),
                        folder: entry.folder,
                        target_kind: reference.kind,
                        target: reference.name,
                    });
                }
            }
        }
        Ok(())
    }

    /// Filter plan to only include entries matching a predicate
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&ManifestEntry) -> bool,
    {
        Self {
            entries: self.entries.into_iter().filter(|e| predicate(e)).collect(),
        }
    }

    /// Filter plan to only include entries matching a target
    pub fn filter_by_target(self, target: Option<&Target>) -> Self {
        match target {
            None => self,
            Some(t) => self.filter(|e| t.matches(e)),
        }
    }

    /// Folders with at least one entry, in first-seen order
    pub fn folders(&self) -> Vec<Folder> {
        let mut folders = Vec::new();
        for entry in &self.entries {
            if !folders.contains(&entry.folder) {
                folders.push(entry.folder);
            }
        }
        folders
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Target selector: `kind` or `kind.name`
///
/// Only the first `.` separates kind from name, so names may contain dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: ResourceKind,
    pub name: Option<String>,
}

impl Target {
    pub fn matches(&self, entry: &ManifestEntry) -> bool {
        entry.kind() == self.kind && self.name.as_deref().is_none_or(|n| n == entry.name())
    }
}

impl FromStr for Target {
    type Err = sasekit::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(2, '.');
        let kind = parts.next().unwrap_or_default().parse()?;
        let name = parts.next().filter(|n| !n.is_empty()).map(String::from);
        Ok(Self { kind, name })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}.{}", self.kind, name),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn entry(kind: ResourceKind, folder: Folder, ensure: Ensure, fields: Value) -> ManifestEntry {
        ManifestEntry::new(folder, ensure, Descriptor::from_fields(kind, fields).unwrap())
    }

    fn tunnel(name: &str, gateway: &str) -> Value {
        json!({
            "name": name,
            "auto_key": {"ike_gateway": [{"name": gateway}], "ipsec_crypto_profile": "p"}
        })
    }

    fn labels(plan: &ExecutionPlan) -> Vec<String> {
        plan.ordered().iter().map(|e| e.label()).collect()
    }

    #[test]
    fn test_ordered_present_follows_dependencies() {
        let mut plan = ExecutionPlan::new();
        plan.add(entry(
            ResourceKind::RemoteNetwork,
            Folder::RemoteNetworks,
            Ensure::Present,
            json!({"name": "rn", "region": "us-west-2", "ipsec_tunnel": "t"}),
        ));
        plan.add(entry(
            ResourceKind::IpsecTunnel,
            Folder::RemoteNetworks,
            Ensure::Present,
            tunnel("t", "gw"),
        ));
        plan.add(entry(
            ResourceKind::IkeGateway,
            Folder::RemoteNetworks,
            Ensure::Present,
            json!({"name": "gw"}),
        ));

        assert_eq!(
            labels(&plan),
            vec!["ike_gateway.gw", "ipsec_tunnel.t", "remote_network.rn"]
        );
    }

    #[test]
    fn test_ordered_absent_first_in_reverse() {
        let mut plan = ExecutionPlan::new();
        plan.add(entry(ResourceKind::Tag, Folder::Shared, Ensure::Present, json!({"name": "new"})));
        plan.add(entry(
            ResourceKind::IkeGateway,
            Folder::RemoteNetworks,
            Ensure::Absent,
            json!({"name": "gw"}),
        ));
        plan.add(entry(
            ResourceKind::IpsecTunnel,
            Folder::RemoteNetworks,
            Ensure::Absent,
            tunnel("t", "gw"),
        ));

        assert_eq!(
            labels(&plan),
            vec!["ipsec_tunnel.t", "ike_gateway.gw", "tag.new"]
        );
    }

    #[test]
    fn test_ordered_stable_within_rank() {
        let mut plan = ExecutionPlan::new();
        for name in ["b", "a", "c"] {
            plan.add(entry(ResourceKind::Tag, Folder::Shared, Ensure::Present, json!({"name": name})));
        }
        assert_eq!(labels(&plan), vec!["tag.b", "tag.a", "tag.c"]);
    }

    #[test]
    fn test_check_references_rejects_removed_target() {
        let mut plan = ExecutionPlan::new();
        plan.add(entry(
            ResourceKind::IpsecTunnel,
            Folder::RemoteNetworks,
            Ensure::Present,
            tunnel("t", "gw"),
        ));
        plan.add(entry(
            ResourceKind::IkeGateway,
            Folder::RemoteNetworks,
            Ensure::Absent,
            json!({"name": "gw"}),
        ));

        let err = plan.check_references().unwrap_err();
        match err {
            Error::Dependency {
                kind,
                target_kind,
                target,
                ..
            } => {
                assert_eq!(kind, ResourceKind::IpsecTunnel);
                assert_eq!(target_kind, ResourceKind::IkeGateway);
                assert_eq!(target, "gw");
            }
            other => panic!("Expected Dependency, got {other:?}"),
        }
    }

    #[test]
    fn test_check_references_other_folder_is_fine() {
        let mut plan = ExecutionPlan::new();
        plan.add(entry(
            ResourceKind::IpsecTunnel,
            Folder::RemoteNetworks,
            Ensure::Present,
            tunnel("t", "gw"),
        ));
        plan.add(entry(
            ResourceKind::IkeGateway,
            Folder::ServiceConnections,
            Ensure::Absent,
            json!({"name": "gw"}),
        ));
        assert!(plan.check_references().is_ok());
    }

    #[test]
    fn test_parse_target() {
        let kind_only: Target = "tag".parse().unwrap();
        assert_eq!(
            kind_only,
            Target {
                kind: ResourceKind::Tag,
                name: None
            }
        );

        let named: Target = "address.web.example.com".parse().unwrap();
        assert_eq!(named.kind, ResourceKind::Address);
        assert_eq!(named.name.as_deref(), Some("web.example.com"));
        assert_eq!(named.to_string(), "address.web.example.com");

        assert!("widget.x".parse::<Target>().is_err());
    }

    #[test]
    fn test_filter_by_target_is_exact() {
        let mut plan = ExecutionPlan::new();
        plan.add(entry(ResourceKind::Tag, Folder::Shared, Ensure::Present, json!({"name": "web"})));
        plan.add(entry(ResourceKind::Tag, Folder::Shared, Ensure::Present, json!({"name": "web-1"})));
        plan.add(entry(
            ResourceKind::Address,
            Folder::Shared,
            Ensure::Present,
            json!({"name": "web", "fqdn": "web.example"}),
        ));

        let target: Target = "tag.web".parse().unwrap();
        let filtered = plan.clone().filter_by_target(Some(&target));
        assert_eq!(labels(&filtered), vec!["tag.web"]);

        let target: Target = "tag".parse().unwrap();
        assert_eq!(plan.clone().filter_by_target(Some(&target)).len(), 2);
        assert_eq!(plan.filter_by_target(None).len(), 3);
    }

    #[test]
    fn test_folders_first_seen() {
        let mut plan = ExecutionPlan::new();
        plan.add(entry(ResourceKind::Tag, Folder::Shared, Ensure::Present, json!({"name": "a"})));
        plan.add(entry(
            ResourceKind::IkeGateway,
            Folder::RemoteNetworks,
            Ensure::Present,
            json!({"name": "gw"}),
        ));
        plan.add(entry(ResourceKind::Tag, Folder::Shared, Ensure::Absent, json!({"name": "b"})));
        assert_eq!(plan.folders(), vec![Folder::Shared, Folder::RemoteNetworks]);
    }
}
