//! Desired-state descriptors, one typed record per resource kind
//!
//! Descriptors are decoded from loosely typed field maps (a manifest table or
//! command-line `key=value` pairs). Unknown keys are rejected at decode time;
//! required fields and variant groups are checked later by the schema
//! validator, so every field here is optional at the type level.

mod address;
mod address_group;
mod ike_gateway;
mod ipsec_tunnel;
mod remote_network;
mod service_connection;
mod tag;

pub use address::{AddressDescriptor, AddressPayload, AddressValue};
pub use address_group::{AddressGroupDescriptor, AddressGroupPayload, DynamicFilter, GroupMembers};
pub use ike_gateway::{
    AuthenticationPayload, CertificateAuth, IdentityType, IkeAuthentication, IkeGatewayDescriptor,
    IkeGatewayPayload, IkeIdentity, IkeProtocol, IkeVersion, IkeVersionSettings, LocalAddress,
    LocalCertificate, PeerAddress, PeerAddressPayload, ProtocolCommon, DEFAULT_IKE_CRYPTO_PROFILE,
};
pub use ipsec_tunnel::{
    AutoKey, GatewayRef, IpsecTunnelDescriptor, IpsecTunnelPayload, TunnelMonitor,
    DEFAULT_TUNNEL_INTERFACE,
};
pub use remote_network::{
    DEFAULT_LICENSE_TYPE, EcmpLoadBalancing, EcmpTunnel, RemoteNetworkDescriptor,
    RemoteNetworkPayload, RemoteTunnel,
};
pub use service_connection::{
    DEFAULT_ONBOARDING_TYPE, NatChoice, ServiceConnectionDescriptor, ServiceConnectionPayload,
};
pub use tag::{TagDescriptor, TagPayload};

use crate::schema::Fields;
use sasekit::ResourceKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Desired state of one resource
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Address(AddressDescriptor),
    AddressGroup(AddressGroupDescriptor),
    Tag(TagDescriptor),
    IkeGateway(IkeGatewayDescriptor),
    IpsecTunnel(IpsecTunnelDescriptor),
    ServiceConnection(ServiceConnectionDescriptor),
    RemoteNetwork(RemoteNetworkDescriptor),
}

/// A by-name reference from one resource to another in the same folder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub kind: ResourceKind,
    pub name: String,
}

impl Reference {
    pub(crate) fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl Descriptor {
    /// Decode a descriptor of `kind` from a JSON object of fields
    ///
    /// # Example
    ///
    /// ```
    /// use declarative::Descriptor;
    /// use sasekit::ResourceKind;
    /// use serde_json::json;
    ///
    /// let d = Descriptor::from_fields(
    ///     ResourceKind::Address,
    ///     json!({"name": "web", "fqdn": "example.com"}),
    /// ).unwrap();
    /// assert_eq!(d.name(), "web");
    /// ```
    pub fn from_fields(kind: ResourceKind, fields: Value) -> serde_json::Result<Self> {
        Ok(match kind {
            ResourceKind::Address => Self::Address(serde_json::from_value(fields)?),
            ResourceKind::AddressGroup => Self::AddressGroup(serde_json::from_value(fields)?),
            ResourceKind::Tag => Self::Tag(serde_json::from_value(fields)?),
            ResourceKind::IkeGateway => Self::IkeGateway(serde_json::from_value(fields)?),
            ResourceKind::IpsecTunnel => Self::IpsecTunnel(serde_json::from_value(fields)?),
            ResourceKind::ServiceConnection => {
                Self::ServiceConnection(serde_json::from_value(fields)?)
            }
            ResourceKind::RemoteNetwork => Self::RemoteNetwork(serde_json::from_value(fields)?),
        })
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Address(_) => ResourceKind::Address,
            Self::AddressGroup(_) => ResourceKind::AddressGroup,
            Self::Tag(_) => ResourceKind::Tag,
            Self::IkeGateway(_) => ResourceKind::IkeGateway,
            Self::IpsecTunnel(_) => ResourceKind::IpsecTunnel,
            Self::ServiceConnection(_) => ResourceKind::ServiceConnection,
            Self::RemoteNetwork(_) => ResourceKind::RemoteNetwork,
        }
    }

    /// Name, the only correlation key against remote objects
    pub fn name(&self) -> &str {
        match self {
            Self::Address(d) => &d.name,
            Self::AddressGroup(d) => &d.name,
            Self::Tag(d) => &d.name,
            Self::IkeGateway(d) => &d.name,
            Self::IpsecTunnel(d) => &d.name,
            Self::ServiceConnection(d) => &d.name,
            Self::RemoteNetwork(d) => &d.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Address(d) => d.description.as_deref(),
            Self::AddressGroup(d) => d.description.as_deref(),
            _ => None,
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            Self::Address(d) => &d.tag,
            Self::AddressGroup(d) => &d.tag,
            _ => &[],
        }
    }

    /// Resources this one names and therefore needs to exist first
    pub fn references(&self) -> Vec<Reference> {
        match self {
            Self::Address(d) => d.references(),
            Self::AddressGroup(d) => d.references(),
            Self::Tag(_) | Self::IkeGateway(_) => Vec::new(),
            Self::IpsecTunnel(d) => d.references(),
            Self::ServiceConnection(d) => d.references(),
            Self::RemoteNetwork(d) => d.references(),
        }
    }

    pub(crate) fn fields(&self) -> &dyn Fields {
        match self {
            Self::Address(d) => d,
            Self::AddressGroup(d) => d,
            Self::Tag(d) => d,
            Self::IkeGateway(d) => d,
            Self::IpsecTunnel(d) => d,
            Self::ServiceConnection(d) => d,
            Self::RemoteNetwork(d) => d,
        }
    }
}

/// Whether an optional string is present and non-empty
pub(crate) fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// The value of an optional string if it is present and non-empty
pub(crate) fn set(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

/// `{ "enable": bool }`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Toggle {
    pub enable: bool,
}

impl Toggle {
    pub fn on() -> Self {
        Self { enable: true }
    }

    pub fn off() -> Self {
        Self { enable: false }
    }
}

/// Serializes as `{}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Empty {}

/// BGP peer addressing shared by service connections and remote networks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BgpPeer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_ipv6_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_ipv6_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_as_primary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

/// `protocol: { bgp: {...} }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingProtocol {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgp: Option<BgpSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BgpSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_not_export_routes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fast_failover: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub originate_default_route: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_as: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarize_mobile_user_routes: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Qos {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos_profile: Option<String>,
}
