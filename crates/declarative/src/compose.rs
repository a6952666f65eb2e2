//! Payload composer - builds the wire representation from a validated descriptor
//!
//! Composition is deterministic and total. Each payload is a typed value
//! built once, with the populated variant under its canonical key and
//! kind-specific defaults filled in.

use crate::descriptor::{
    AddressGroupPayload, AddressPayload, Descriptor, IkeGatewayPayload, IpsecTunnelPayload,
    RemoteNetworkPayload, ServiceConnectionPayload, TagPayload,
};
use crate::schema::Validated;
use sasekit::ResourceKind;
use serde::Serialize;
use serde_json::Value;

/// Wire payload for a create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Address(AddressPayload),
    AddressGroup(AddressGroupPayload),
    Tag(TagPayload),
    IkeGateway(IkeGatewayPayload),
    IpsecTunnel(IpsecTunnelPayload),
    ServiceConnection(ServiceConnectionPayload),
    RemoteNetwork(RemoteNetworkPayload),
}

impl Payload {
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

    /// Encode as JSON for the session
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Compose the create payload for a validated descriptor
pub fn compose(validated: &Validated<'_>) -> Payload {
    match validated.descriptor() {
        Descriptor::Address(d) => Payload::Address(d.compose()),
        Descriptor::AddressGroup(d) => Payload::AddressGroup(d.compose()),
        Descriptor::Tag(d) => Payload::Tag(d.compose()),
        Descriptor::IkeGateway(d) => Payload::IkeGateway(d.compose()),
        Descriptor::IpsecTunnel(d) => Payload::IpsecTunnel(d.compose()),
        Descriptor::ServiceConnection(d) => Payload::ServiceConnection(d.compose()),
        Descriptor::RemoteNetwork(d) => Payload::RemoteNetwork(d.compose()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate;
    use pretty_assertions::assert_eq;
    use sasekit::Folder;
    use serde_json::json;

    fn compose_value(kind: ResourceKind, folder: Folder, fields: Value) -> Value {
        let d = Descriptor::from_fields(kind, fields).unwrap();
        let validated = validate(folder, &d).unwrap();
        let payload = compose(&validated);
        assert_eq!(payload.kind(), kind);
        payload.to_value().unwrap()
    }

    #[test]
    fn test_compose_is_deterministic() {
        let fields = json!({"name": "web", "description": "d", "fqdn": "example.com", "tag": ["prod"]});
        let d = Descriptor::from_fields(ResourceKind::Address, fields).unwrap();
        let validated = validate(Folder::Shared, &d).unwrap();
        assert_eq!(compose(&validated), compose(&validated));
    }

    #[test]
    fn test_ike_gateway_defaults_when_protocol_missing() {
        let payload = compose_value(
            ResourceKind::IkeGateway,
            Folder::RemoteNetworks,
            json!({
                "name": "gw",
                "peer_id": {"id": "peer.example", "type": "fqdn"},
                "authentication": {"pre_shared_key": "k"},
                "peer_address": {"fqdn": "peer.example"}
            }),
        );
        assert_eq!(payload["protocol"]["version"], "ikev2-preferred");
        assert_eq!(
            payload["protocol"]["ikev1"]["ike_crypto_profile"],
            "PaloAlto-Networks-IKE-Crypto"
        );
        assert_eq!(
            payload["protocol"]["ikev2"]["ike_crypto_profile"],
            "PaloAlto-Networks-IKE-Crypto"
        );
        assert_eq!(payload["protocol"]["ikev2"]["dpd"]["enable"], true);
        assert_eq!(payload["protocol_common"]["nat_traversal"]["enable"], true);
        assert_eq!(payload["protocol_common"]["fragmentation"]["enable"], false);
        assert_eq!(payload["local_address"], json!({"interface": "vlan"}));
    }

    #[test]
    fn test_tunnel_interface_default() {
        let payload = compose_value(
            ResourceKind::IpsecTunnel,
            Folder::ServiceConnections,
            json!({
                "name": "t",
                "auto_key": {"ike_gateway": [{"name": "gw"}], "ipsec_crypto_profile": "p"}
            }),
        );
        assert_eq!(payload["tunnel_interface"], "tunnel");
        assert_eq!(payload["anti_replay"], false);
    }

    #[test]
    fn test_payload_excludes_folder_and_state() {
        let payload = compose_value(
            ResourceKind::Tag,
            Folder::Shared,
            json!({"name": "t", "color": "Blue"}),
        );
        assert_eq!(payload, json!({"name": "t", "color": "Blue"}));
    }
}
