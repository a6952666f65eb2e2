use super::{Reference, set};
use crate::schema::Fields;
use sasekit::ResourceKind;
use serde::{Deserialize, Serialize};

/// Tunnel interface used when none is given.
pub const DEFAULT_TUNNEL_INTERFACE: &str = "tunnel";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IpsecTunnelDescriptor {
    pub name: String,
    pub auto_key: Option<AutoKey>,
    pub anti_replay: Option<bool>,
    pub copy_tos: Option<bool>,
    pub enable_gre_encapsulation: Option<bool>,
    pub tunnel_monitor: Option<TunnelMonitor>,
    pub tunnel_interface: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutoKey {
    pub ike_gateway: Vec<GatewayRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipsec_crypto_profile: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TunnelMonitor {
    pub enable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpsecTunnelPayload {
    pub name: String,
    pub auto_key: AutoKey,
    pub anti_replay: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_tos: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_gre_encapsulation: Option<bool>,
    pub tunnel_monitor: TunnelMonitor,
    pub tunnel_interface: String,
}

impl Fields for IpsecTunnelDescriptor {
    fn populated(&self, field: &str) -> bool {
        let auto_key = self.auto_key.as_ref();
        match field {
            "auto_key.ike_gateway" => auto_key.is_some_and(|k| {
                !k.ike_gateway.is_empty() && k.ike_gateway.iter().all(|g| !g.name.is_empty())
            }),
            "auto_key.ipsec_crypto_profile" => {
                auto_key.is_some_and(|k| k.ipsec_crypto_profile.as_deref().is_some_and(|p| !p.is_empty()))
            }
            _ => false,
        }
    }
}

impl IpsecTunnelDescriptor {
    pub(crate) fn compose(&self) -> IpsecTunnelPayload {
        IpsecTunnelPayload {
            name: self.name.clone(),
            auto_key: self.auto_key.clone().unwrap_or_default(),
            anti_replay: self.anti_replay.unwrap_or(false),
            copy_tos: self.copy_tos,
            enable_gre_encapsulation: self.enable_gre_encapsulation,
            tunnel_monitor: self.tunnel_monitor.clone().unwrap_or_default(),
            tunnel_interface: set(&self.tunnel_interface)
                .unwrap_or_else(|| DEFAULT_TUNNEL_INTERFACE.to_string()),
        }
    }

    pub(crate) fn references(&self) -> Vec<Reference> {
        self.auto_key
            .iter()
            .flat_map(|k| &k.ike_gateway)
            .map(|g| Reference::new(ResourceKind::IkeGateway, &g.name))
            .collect()
    }
}
