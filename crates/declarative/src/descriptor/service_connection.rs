use super::{BgpPeer, Qos, Reference, RoutingProtocol, filled, set};
use crate::schema::Fields;
use sasekit::ResourceKind;
use serde::{Deserialize, Serialize};

/// Onboarding type used when none is given.
pub const DEFAULT_ONBOARDING_TYPE: &str = "classic";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConnectionDescriptor {
    pub name: String,
    pub ipsec_tunnel: Option<String>,
    pub region: Option<String>,
    pub subnets: Vec<String>,
    pub backup_sc: Option<String>,
    pub bgp_peer: Option<BgpPeer>,
    pub nat_pool: Option<String>,
    pub no_export_community: Option<String>,
    pub onboarding_type: Option<String>,
    pub protocol: Option<RoutingProtocol>,
    pub qos: Option<Qos>,
    pub secondary_ipsec_tunnel: Option<String>,
    pub source_nat: Option<bool>,
}

/// At most one of these is sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NatChoice {
    NatPool(String),
    SourceNat(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceConnectionPayload {
    pub name: String,
    pub ipsec_tunnel: String,
    pub region: String,
    pub onboarding_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subnets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_sc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgp_peer: Option<BgpPeer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_export_community: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<RoutingProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos: Option<Qos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_ipsec_tunnel: Option<String>,
    #[serde(flatten)]
    pub nat: Option<NatChoice>,
}

impl Fields for ServiceConnectionDescriptor {
    fn populated(&self, field: &str) -> bool {
        match field {
            "ipsec_tunnel" => filled(&self.ipsec_tunnel),
            "region" => filled(&self.region),
            "subnets" => self.subnets.iter().any(|s| !s.is_empty()),
            "nat_pool" => filled(&self.nat_pool),
            "source_nat" => self.source_nat == Some(true),
            _ => false,
        }
    }
}

impl ServiceConnectionDescriptor {
    pub(crate) fn compose(&self) -> ServiceConnectionPayload {
        let nat = match (set(&self.nat_pool), self.source_nat) {
            (Some(pool), _) => Some(NatChoice::NatPool(pool)),
            (None, Some(true)) => Some(NatChoice::SourceNat(true)),
            _ => None,
        };

        ServiceConnectionPayload {
            name: self.name.clone(),
            ipsec_tunnel: self.ipsec_tunnel.clone().unwrap_or_default(),
            region: self.region.clone().unwrap_or_default(),
            onboarding_type: set(&self.onboarding_type)
                .unwrap_or_else(|| DEFAULT_ONBOARDING_TYPE.to_string()),
            subnets: self.subnets.clone(),
            backup_sc: set(&self.backup_sc),
            bgp_peer: self.bgp_peer.clone(),
            no_export_community: set(&self.no_export_community),
            protocol: self.protocol.clone(),
            qos: self.qos.clone(),
            secondary_ipsec_tunnel: set(&self.secondary_ipsec_tunnel),
            nat,
        }
    }

    pub(crate) fn references(&self) -> Vec<Reference> {
        [&self.ipsec_tunnel, &self.secondary_ipsec_tunnel]
            .into_iter()
            .filter_map(set)
            .map(|t| Reference::new(ResourceKind::IpsecTunnel, t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_compose_minimal() {
        let d: ServiceConnectionDescriptor = serde_json::from_value(json!({
            "name": "sc1",
            "ipsec_tunnel": "t1",
            "region": "us-east-1"
        }))
        .unwrap();
        assert_eq!(
            serde_json::to_value(d.compose()).unwrap(),
            json!({
                "name": "sc1",
                "ipsec_tunnel": "t1",
                "region": "us-east-1",
                "onboarding_type": "classic"
            })
        );
    }

    #[test]
    fn test_compose_nat_and_bgp() {
        let d: ServiceConnectionDescriptor = serde_json::from_value(json!({
            "name": "sc1",
            "ipsec_tunnel": "t1",
            "region": "us-east-1",
            "subnets": ["10.1.0.0/16"],
            "nat_pool": "pool1",
            "protocol": {"bgp": {"enable": true, "peer_as": "65001"}},
            "qos": {"enable": true, "qos_profile": "default"}
        }))
        .unwrap();
        let payload = serde_json::to_value(d.compose()).unwrap();
        assert_eq!(payload["nat_pool"], "pool1");
        assert!(payload.get("source_nat").is_none());
        assert_eq!(payload["protocol"], json!({"bgp": {"enable": true, "peer_as": "65001"}}));
        assert_eq!(payload["subnets"], json!(["10.1.0.0/16"]));
    }

    #[test]
    fn test_references_tunnels() {
        let d = ServiceConnectionDescriptor {
            name: "sc".into(),
            ipsec_tunnel: Some("primary".into()),
            secondary_ipsec_tunnel: Some("backup".into()),
            ..Default::default()
        };
        let names: Vec<String> = d.references().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["primary", "backup"]);
    }
}
