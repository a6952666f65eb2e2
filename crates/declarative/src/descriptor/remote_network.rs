use super::{BgpPeer, Reference, RoutingProtocol, filled, set};
use crate::schema::Fields;
use sasekit::ResourceKind;
use serde::{Deserialize, Serialize};

/// License type used when none is given.
pub const DEFAULT_LICENSE_TYPE: &str = "FWAAS-AGGREGATE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteNetworkDescriptor {
    pub name: String,
    pub region: Option<String>,
    pub license_type: Option<String>,
    pub spn_name: Option<String>,
    pub subnets: Vec<String>,
    pub ecmp_load_balancing: Option<EcmpLoadBalancing>,
    pub ecmp_tunnels: Vec<EcmpTunnel>,
    pub ipsec_tunnel: Option<String>,
    pub secondary_ipsec_tunnel: Option<String>,
    pub protocol: Option<RoutingProtocol>,
    pub bgp_peer: Option<BgpPeer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcmpLoadBalancing {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EcmpTunnel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub ipsec_tunnel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_as: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peering_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_not_export_routes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub originate_default_route: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarize_mobile_user_routes: Option<bool>,
}

/// Either one primary tunnel (with an optional secondary) or an ECMP set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RemoteTunnel {
    Single {
        ipsec_tunnel: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        secondary_ipsec_tunnel: Option<String>,
    },
    Ecmp {
        ecmp_tunnels: Vec<EcmpTunnel>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteNetworkPayload {
    pub name: String,
    pub region: String,
    pub license_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spn_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subnets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecmp_load_balancing: Option<EcmpLoadBalancing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<RoutingProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgp_peer: Option<BgpPeer>,
    #[serde(flatten)]
    pub tunnel: RemoteTunnel,
}

impl Fields for RemoteNetworkDescriptor {
    fn populated(&self, field: &str) -> bool {
        match field {
            "region" => filled(&self.region),
            "ipsec_tunnel" => filled(&self.ipsec_tunnel),
            "secondary_ipsec_tunnel" => filled(&self.secondary_ipsec_tunnel),
            "ecmp_tunnels" => !self.ecmp_tunnels.is_empty(),
            _ => false,
        }
    }
}

impl RemoteNetworkDescriptor {
    pub(crate) fn compose(&self) -> RemoteNetworkPayload {
        let tunnel = match set(&self.ipsec_tunnel) {
            Some(ipsec_tunnel) => RemoteTunnel::Single {
                ipsec_tunnel,
                secondary_ipsec_tunnel: set(&self.secondary_ipsec_tunnel),
            },
            None => RemoteTunnel::Ecmp {
                ecmp_tunnels: self.ecmp_tunnels.clone(),
            },
        };

        RemoteNetworkPayload {
            name: self.name.clone(),
            region: self.region.clone().unwrap_or_default(),
            license_type: set(&self.license_type)
                .unwrap_or_else(|| DEFAULT_LICENSE_TYPE.to_string()),
            spn_name: set(&self.spn_name),
            subnets: self.subnets.clone(),
            ecmp_load_balancing: self.ecmp_load_balancing,
            protocol: self.protocol.clone(),
            bgp_peer: self.bgp_peer.clone(),
            tunnel,
        }
    }

    pub(crate) fn references(&self) -> Vec<Reference> {
        [&self.ipsec_tunnel, &self.secondary_ipsec_tunnel]
            .into_iter()
            .filter_map(set)
            .chain(
                self.ecmp_tunnels
                    .iter()
                    .map(|t| t.ipsec_tunnel.clone())
                    .filter(|t| !t.is_empty()),
            )
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
    fn test_compose_single_tunnel() {
        let d: RemoteNetworkDescriptor = serde_json::from_value(json!({
            "name": "branch-1",
            "region": "us-west-2",
            "spn_name": "us-west-spn",
            "ipsec_tunnel": "t1",
            "subnets": ["192.168.10.0/24"]
        }))
        .unwrap();
        assert_eq!(
            serde_json::to_value(d.compose()).unwrap(),
            json!({
                "name": "branch-1",
                "region": "us-west-2",
                "license_type": "FWAAS-AGGREGATE",
                "spn_name": "us-west-spn",
                "subnets": ["192.168.10.0/24"],
                "ipsec_tunnel": "t1"
            })
        );
    }

    #[test]
    fn test_compose_ecmp() {
        let d: RemoteNetworkDescriptor = serde_json::from_value(json!({
            "name": "branch-2",
            "region": "us-west-2",
            "ecmp_load_balancing": "enabled",
            "ecmp_tunnels": [
                {"name": "e1", "ipsec_tunnel": "t1", "peer_as": "65010"},
                {"name": "e2", "ipsec_tunnel": "t2", "peer_as": "65010"}
            ]
        }))
        .unwrap();
        let payload = serde_json::to_value(d.compose()).unwrap();
        assert_eq!(payload["ecmp_load_balancing"], "enabled");
        assert_eq!(payload["ecmp_tunnels"][1]["ipsec_tunnel"], "t2");
        assert!(payload.get("ipsec_tunnel").is_none());
    }

    #[test]
    fn test_references_all_tunnels() {
        let d = RemoteNetworkDescriptor {
            name: "rn".into(),
            ipsec_tunnel: Some("a".into()),
            secondary_ipsec_tunnel: Some("b".into()),
            ecmp_tunnels: vec![EcmpTunnel {
                ipsec_tunnel: "c".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let names: Vec<String> = d.references().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
