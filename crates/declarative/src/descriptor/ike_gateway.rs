use super::{Empty, Toggle, filled, set};
use crate::schema::Fields;
use serde::{Deserialize, Serialize};

/// Crypto profile referenced by the default protocol block.
pub const DEFAULT_IKE_CRYPTO_PROFILE: &str = "PaloAlto-Networks-IKE-Crypto";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IkeGatewayDescriptor {
    pub name: String,
    pub authentication: Option<IkeAuthentication>,
    pub peer_address: Option<PeerAddress>,
    pub peer_id: Option<IkeIdentity>,
    pub local_id: Option<IkeIdentity>,
    pub protocol: Option<IkeProtocol>,
    pub protocol_common: Option<ProtocolCommon>,
}

/// Exactly one of `pre_shared_key` or `certificate`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IkeAuthentication {
    pub pre_shared_key: Option<String>,
    pub certificate: Option<CertificateAuth>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CertificateAuth {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_id_payload_mismatch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_certificate: Option<LocalCertificate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_validation_revocation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_management_as_source: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalCertificate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_certificate_name: Option<String>,
}

/// Exactly one of `ip`, `fqdn` or `dynamic`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PeerAddress {
    pub ip: Option<String>,
    pub fqdn: Option<String>,
    pub dynamic: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityType {
    Ipaddr,
    Keyid,
    Fqdn,
    Ufqdn,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IkeIdentity {
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub id_type: Option<IdentityType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IkeVersion {
    #[serde(rename = "ikev2-preferred")]
    Ikev2Preferred,
    #[serde(rename = "ikev1")]
    Ikev1,
    #[serde(rename = "ikev2")]
    Ikev2,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IkeProtocol {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<IkeVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ikev1: Option<IkeVersionSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ikev2: Option<IkeVersionSettings>,
}

impl IkeProtocol {
    /// IKEv2 preferred, both versions on the default profile with DPD enabled
    pub fn preferred() -> Self {
        let settings = IkeVersionSettings {
            ike_crypto_profile: Some(DEFAULT_IKE_CRYPTO_PROFILE.to_string()),
            dpd: Some(Toggle::on()),
        };
        Self {
            version: Some(IkeVersion::Ikev2Preferred),
            ikev1: Some(settings.clone()),
            ikev2: Some(settings),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IkeVersionSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ike_crypto_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpd: Option<Toggle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtocolCommon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat_traversal: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragmentation: Option<Toggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passive_mode: Option<bool>,
}

impl ProtocolCommon {
    /// NAT traversal on, fragmentation off
    pub fn standard() -> Self {
        Self {
            nat_traversal: Some(Toggle::on()),
            fragmentation: Some(Toggle::off()),
            passive_mode: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationPayload {
    PreSharedKey { key: String },
    Certificate(CertificateAuth),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerAddressPayload {
    Ip(String),
    Fqdn(String),
    Dynamic(Empty),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalAddress {
    pub interface: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IkeGatewayPayload {
    pub name: String,
    pub authentication: AuthenticationPayload,
    pub peer_address: PeerAddressPayload,
    pub peer_id: IkeIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<IkeIdentity>,
    pub local_address: LocalAddress,
    pub protocol: IkeProtocol,
    pub protocol_common: ProtocolCommon,
}

impl Fields for IkeGatewayDescriptor {
    fn populated(&self, field: &str) -> bool {
        let auth = self.authentication.as_ref();
        let peer = self.peer_address.as_ref();
        match field {
            "peer_id.id" => self.peer_id.as_ref().is_some_and(|p| !p.id.is_empty()),
            "peer_id.type" => self.peer_id.as_ref().is_some_and(|p| p.id_type.is_some()),
            "authentication.pre_shared_key" => auth.is_some_and(|a| filled(&a.pre_shared_key)),
            "authentication.certificate" => auth.is_some_and(|a| a.certificate.is_some()),
            "peer_address.ip" => peer.is_some_and(|p| filled(&p.ip)),
            "peer_address.fqdn" => peer.is_some_and(|p| filled(&p.fqdn)),
            "peer_address.dynamic" => peer.is_some_and(|p| p.dynamic == Some(true)),
            _ => false,
        }
    }
}

impl IkeGatewayDescriptor {
    pub(crate) fn compose(&self) -> IkeGatewayPayload {
        let auth = self.authentication.clone().unwrap_or_default();
        let authentication = match (set(&auth.pre_shared_key), auth.certificate) {
            (Some(key), _) => AuthenticationPayload::PreSharedKey { key },
            (None, certificate) => {
                AuthenticationPayload::Certificate(certificate.unwrap_or_default())
            }
        };

        let peer = self.peer_address.clone().unwrap_or_default();
        let peer_address = if let Some(ip) = set(&peer.ip) {
            PeerAddressPayload::Ip(ip)
        } else if let Some(fqdn) = set(&peer.fqdn) {
            PeerAddressPayload::Fqdn(fqdn)
        } else {
            PeerAddressPayload::Dynamic(Empty {})
        };

        IkeGatewayPayload {
            name: self.name.clone(),
            authentication,
            peer_address,
            peer_id: self.peer_id.clone().unwrap_or_default(),
            local_id: self.local_id.clone(),
            local_address: LocalAddress {
                interface: "vlan".to_string(),
            },
            protocol: self.protocol.clone().unwrap_or_else(IkeProtocol::preferred),
            protocol_common: self
                .protocol_common
                .clone()
                .unwrap_or_else(ProtocolCommon::standard),
        }
    }
}
