//! Schema validator - required fields and variant groups per resource kind
//!
//! Each kind has a fixed table. A descriptor that fails any check never
//! reaches the payload composer or the session.

use crate::descriptor::Descriptor;
use crate::error::ValidationError;
use sasekit::{Folder, ResourceKind};

/// Longest accepted name
pub const MAX_NAME_LEN: usize = 63;

/// Longest accepted description
pub const MAX_DESCRIPTION_LEN: usize = 1023;

/// Most tags a single object may carry
pub const MAX_TAGS: usize = 64;

/// How many members of a group may be populated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    ExactlyOne,
    AtMostOne,
}

/// A set of mutually exclusive fields
#[derive(Debug)]
pub struct VariantGroup {
    pub name: &'static str,
    pub members: &'static [&'static str],
    pub rule: Rule,
}

/// Validation table for one kind
///
/// Field paths are dotted for nested records (`peer_id.type`).
#[derive(Debug)]
pub struct KindSchema {
    pub kind: ResourceKind,
    pub required: &'static [&'static str],
    pub groups: &'static [VariantGroup],
}

/// Field presence lookup used by the validator
///
/// A field is populated when it is present and non-empty. Unknown paths are
/// never populated.
pub trait Fields {
    fn populated(&self, field: &str) -> bool;
}

static ADDRESS: KindSchema = KindSchema {
    kind: ResourceKind::Address,
    required: &["description"],
    groups: &[VariantGroup {
        name: "value",
        members: &["fqdn", "ip_netmask", "ip_range", "ip_wildcard"],
        rule: Rule::ExactlyOne,
    }],
};

static ADDRESS_GROUP: KindSchema = KindSchema {
    kind: ResourceKind::AddressGroup,
    required: &["description"],
    groups: &[VariantGroup {
        name: "members",
        members: &["static", "dynamic.filter"],
        rule: Rule::ExactlyOne,
    }],
};

static TAG: KindSchema = KindSchema {
    kind: ResourceKind::Tag,
    required: &[],
    groups: &[],
};

static IKE_GATEWAY: KindSchema = KindSchema {
    kind: ResourceKind::IkeGateway,
    required: &["peer_id.id", "peer_id.type"],
    groups: &[
        VariantGroup {
            name: "authentication",
            members: &["authentication.pre_shared_key", "authentication.certificate"],
            rule: Rule::ExactlyOne,
        },
        VariantGroup {
            name: "peer_address",
            members: &["peer_address.ip", "peer_address.fqdn", "peer_address.dynamic"],
            rule: Rule::ExactlyOne,
        },
    ],
};

static IPSEC_TUNNEL: KindSchema = KindSchema {
    kind: ResourceKind::IpsecTunnel,
    required: &["auto_key.ike_gateway", "auto_key.ipsec_crypto_profile"],
    groups: &[],
};

static SERVICE_CONNECTION: KindSchema = KindSchema {
    kind: ResourceKind::ServiceConnection,
    required: &["ipsec_tunnel", "region", "subnets"],
    groups: &[VariantGroup {
        name: "nat",
        members: &["nat_pool", "source_nat"],
        rule: Rule::AtMostOne,
    }],
};

static REMOTE_NETWORK: KindSchema = KindSchema {
    kind: ResourceKind::RemoteNetwork,
    required: &["region"],
    groups: &[
        VariantGroup {
            name: "tunnel",
            members: &["ipsec_tunnel", "ecmp_tunnels"],
            rule: Rule::ExactlyOne,
        },
        VariantGroup {
            name: "secondary_tunnel",
            members: &["secondary_ipsec_tunnel", "ecmp_tunnels"],
            rule: Rule::AtMostOne,
        },
    ],
};

/// Get the validation table for a kind
pub fn schema_for(kind: ResourceKind) -> &'static KindSchema {
    match kind {
        ResourceKind::Address => &ADDRESS,
        ResourceKind::AddressGroup => &ADDRESS_GROUP,
        ResourceKind::Tag => &TAG,
        ResourceKind::IkeGateway => &IKE_GATEWAY,
        ResourceKind::IpsecTunnel => &IPSEC_TUNNEL,
        ResourceKind::ServiceConnection => &SERVICE_CONNECTION,
        ResourceKind::RemoteNetwork => &REMOTE_NETWORK,
    }
}

/// A descriptor that passed validation for a folder
///
/// Only [`validate`] constructs this, so holding one proves the checks ran.
#[derive(Debug, Clone, Copy)]
pub struct Validated<'a> {
    folder: Folder,
    descriptor: &'a Descriptor,
}

impl<'a> Validated<'a> {
    pub fn folder(&self) -> Folder {
        self.folder
    }

    pub fn descriptor(&self) -> &'a Descriptor {
        self.descriptor
    }

    pub fn kind(&self) -> ResourceKind {
        self.descriptor.kind()
    }

    pub fn name(&self) -> &'a str {
        self.descriptor.name()
    }
}

/// Validate a descriptor for placement in `folder`
///
/// Pure: no remote call, no side effects.
pub fn validate(folder: Folder, descriptor: &Descriptor) -> Result<Validated<'_>, ValidationError> {
    let kind = descriptor.kind();
    let label = kind.display_name();

    let name = descriptor.name();
    if name.is_empty() {
        return Err(ValidationError::new(kind, "name", format!("name is required for {label}")));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::new(
            kind,
            "name",
            format!("name must be at most {MAX_NAME_LEN} characters"),
        ));
    }

    if !kind.allows(folder) {
        return Err(ValidationError::new(
            kind,
            "folder",
            format!("{label} cannot be placed in folder '{folder}'"),
        ));
    }

    let fields = descriptor.fields();
    let schema = schema_for(kind);

    if let Some(missing) = schema.required.iter().find(|f| !fields.populated(f)) {
        return Err(ValidationError::new(
            kind,
            *missing,
            format!("{missing} is required for {label}"),
        ));
    }

    for group in schema.groups {
        let chosen: Vec<&str> = group
            .members
            .iter()
            .copied()
            .filter(|m| fields.populated(m))
            .collect();
        let listed = group.members.join("/");

        let reason = match (group.rule, chosen.len()) {
            (Rule::ExactlyOne, 1) | (Rule::AtMostOne, 0 | 1) => continue,
            (Rule::ExactlyOne, 0) => format!("exactly one of {listed} required for {label}"),
            (Rule::ExactlyOne, _) => format!(
                "exactly one of {listed} required for {label}, got {}",
                chosen.join(", ")
            ),
            (Rule::AtMostOne, _) => format!(
                "at most one of {listed} allowed for {label}, got {}",
                chosen.join(", ")
            ),
        };
        return Err(ValidationError::new(kind, group.name, reason));
    }

    if let Some(description) = descriptor.description()
        && description.chars().count() > MAX_DESCRIPTION_LEN
    {
        return Err(ValidationError::new(
            kind,
            "description",
            format!("description must be at most {MAX_DESCRIPTION_LEN} characters"),
        ));
    }

    if descriptor.tags().len() > MAX_TAGS {
        return Err(ValidationError::new(
            kind,
            "tag",
            format!("at most {MAX_TAGS} tags allowed for {label}"),
        ));
    }

    Ok(Validated { folder, descriptor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn descriptor(kind: ResourceKind, fields: Value) -> Descriptor {
        Descriptor::from_fields(kind, fields).unwrap()
    }

    fn group_of(kind: ResourceKind, folder: Folder, fields: Value) -> String {
        let d = descriptor(kind, fields);
        validate(folder, &d).unwrap_err().group
    }

    #[test]
    fn test_address_exactly_one_value() {
        let ok = descriptor(
            ResourceKind::Address,
            json!({"name": "a", "description": "d", "ip_netmask": "10.0.0.0/8"}),
        );
        let validated = validate(Folder::Shared, &ok).unwrap();
        assert_eq!(validated.name(), "a");
        assert_eq!(validated.folder(), Folder::Shared);

        let none = descriptor(ResourceKind::Address, json!({"name": "a", "description": "d"}));
        let err = validate(Folder::Shared, &none).unwrap_err();
        assert_eq!(err.group, "value");
        assert_eq!(
            err.reason,
            "exactly one of fqdn/ip_netmask/ip_range/ip_wildcard required for Address"
        );

        let two = descriptor(
            ResourceKind::Address,
            json!({"name": "a", "description": "d", "fqdn": "x.example", "ip_netmask": "10.0.0.0/8"}),
        );
        let err = validate(Folder::Shared, &two).unwrap_err();
        assert_eq!(err.kind, ResourceKind::Address);
        assert!(err.reason.contains("got fqdn, ip_netmask"));
    }

    #[test]
    fn test_empty_strings_are_unset() {
        let d = descriptor(
            ResourceKind::Address,
            json!({"name": "a", "description": "d", "fqdn": "", "ip_range": "10.0.0.1-10.0.0.5"}),
        );
        assert!(validate(Folder::Shared, &d).is_ok());
    }

    #[test]
    fn test_name_checks() {
        assert_eq!(
            group_of(ResourceKind::Tag, Folder::Shared, json!({"color": "Red"})),
            "name"
        );
        let long = "n".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            group_of(ResourceKind::Tag, Folder::Shared, json!({"name": long})),
            "name"
        );
        let exact = "n".repeat(MAX_NAME_LEN);
        let d = descriptor(ResourceKind::Tag, json!({"name": exact}));
        assert!(validate(Folder::Shared, &d).is_ok());
    }

    #[test]
    fn test_folder_must_be_allowed() {
        assert_eq!(
            group_of(
                ResourceKind::Tag,
                Folder::MobileUsersContainer,
                json!({"name": "t"})
            ),
            "folder"
        );
    }

    #[test]
    fn test_description_and_tag_limits() {
        let long = "d".repeat(MAX_DESCRIPTION_LEN + 1);
        assert_eq!(
            group_of(
                ResourceKind::Address,
                Folder::Shared,
                json!({"name": "a", "fqdn": "x", "description": long})
            ),
            "description"
        );

        let tags: Vec<String> = (0..=MAX_TAGS).map(|i| format!("t{i}")).collect();
        assert_eq!(
            group_of(
                ResourceKind::AddressGroup,
                Folder::Shared,
                json!({"name": "g", "description": "d", "static": ["a"], "tag": tags})
            ),
            "tag"
        );
    }

    #[test]
    fn test_required_description_and_subnets() {
        let err = validate(
            Folder::Shared,
            &descriptor(ResourceKind::Address, json!({"name": "a", "ip_netmask": "10.0.0.0/24"})),
        )
        .unwrap_err();
        assert_eq!(err.group, "description");
        assert_eq!(err.reason, "description is required for Address");

        assert_eq!(
            group_of(
                ResourceKind::Address,
                Folder::Shared,
                json!({"name": "a", "description": "", "ip_netmask": "10.0.0.0/24"})
            ),
            "description"
        );
        assert_eq!(
            group_of(
                ResourceKind::AddressGroup,
                Folder::Shared,
                json!({"name": "g", "static": ["a"]})
            ),
            "description"
        );
        assert_eq!(
            group_of(
                ResourceKind::ServiceConnection,
                Folder::ServiceConnections,
                json!({"name": "s", "ipsec_tunnel": "t", "region": "us-east-1"})
            ),
            "subnets"
        );
        assert_eq!(
            group_of(
                ResourceKind::ServiceConnection,
                Folder::ServiceConnections,
                json!({"name": "s", "ipsec_tunnel": "t", "region": "us-east-1", "subnets": [""]})
            ),
            "subnets"
        );
    }

    #[test]
    fn test_address_group_members() {
        assert_eq!(
            group_of(
                ResourceKind::AddressGroup,
                Folder::Shared,
                json!({"name": "g", "description": "d"})
            ),
            "members"
        );
        assert_eq!(
            group_of(
                ResourceKind::AddressGroup,
                Folder::Shared,
                json!({"name": "g", "description": "d", "static": ["a"],
                       "dynamic": {"filter": "'web'"}})
            ),
            "members"
        );
        let empty_filter = descriptor(
            ResourceKind::AddressGroup,
            json!({"name": "g", "description": "d", "static": ["a"], "dynamic": {"filter": ""}}),
        );
        assert!(validate(Folder::Shared, &empty_filter).is_ok());
    }

    fn gateway(extra: Value) -> Value {
        let mut base = json!({
            "name": "gw",
            "peer_id": {"id": "peer.example", "type": "fqdn"},
            "authentication": {"pre_shared_key": "k"},
            "peer_address": {"ip": "198.51.100.1"}
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        base
    }

    #[test]
    fn test_ike_gateway_groups() {
        let ok = descriptor(ResourceKind::IkeGateway, gateway(json!({})));
        assert!(validate(Folder::RemoteNetworks, &ok).is_ok());

        assert_eq!(
            group_of(
                ResourceKind::IkeGateway,
                Folder::RemoteNetworks,
                gateway(json!({"authentication": {
                    "pre_shared_key": "k",
                    "certificate": {"certificate_profile": "cp"}
                }}))
            ),
            "authentication"
        );
        assert_eq!(
            group_of(
                ResourceKind::IkeGateway,
                Folder::RemoteNetworks,
                gateway(json!({"authentication": {}}))
            ),
            "authentication"
        );
        assert_eq!(
            group_of(
                ResourceKind::IkeGateway,
                Folder::RemoteNetworks,
                gateway(json!({"peer_address": {"ip": "198.51.100.1", "dynamic": true}}))
            ),
            "peer_address"
        );
        let dynamic_false = descriptor(
            ResourceKind::IkeGateway,
            gateway(json!({"peer_address": {"ip": "198.51.100.1", "dynamic": false}})),
        );
        assert!(validate(Folder::RemoteNetworks, &dynamic_false).is_ok());
    }

    #[test]
    fn test_ike_gateway_requires_peer_id() {
        assert_eq!(
            group_of(
                ResourceKind::IkeGateway,
                Folder::RemoteNetworks,
                gateway(json!({"peer_id": {"id": "x"}}))
            ),
            "peer_id.type"
        );
    }

    #[test]
    fn test_ipsec_tunnel_requires_auto_key() {
        assert_eq!(
            group_of(ResourceKind::IpsecTunnel, Folder::RemoteNetworks, json!({"name": "t"})),
            "auto_key.ike_gateway"
        );
        assert_eq!(
            group_of(
                ResourceKind::IpsecTunnel,
                Folder::RemoteNetworks,
                json!({"name": "t", "auto_key": {"ike_gateway": [{"name": "gw"}]}})
            ),
            "auto_key.ipsec_crypto_profile"
        );
    }

    #[test]
    fn test_service_connection_nat_at_most_one() {
        let base = json!({
            "name": "sc",
            "ipsec_tunnel": "t",
            "region": "us-east-1",
            "subnets": ["10.1.0.0/16"]
        });
        let ok = descriptor(ResourceKind::ServiceConnection, base);
        assert!(validate(Folder::ServiceConnections, &ok).is_ok());

        assert_eq!(
            group_of(
                ResourceKind::ServiceConnection,
                Folder::ServiceConnections,
                json!({"name": "sc", "ipsec_tunnel": "t", "region": "r", "subnets": ["s"],
                       "nat_pool": "p", "source_nat": true})
            ),
            "nat"
        );
        assert_eq!(
            group_of(
                ResourceKind::ServiceConnection,
                Folder::ServiceConnections,
                json!({"name": "sc", "region": "r"})
            ),
            "ipsec_tunnel"
        );
    }

    #[test]
    fn test_remote_network_tunnel_groups() {
        let single = descriptor(
            ResourceKind::RemoteNetwork,
            json!({"name": "rn", "region": "r", "ipsec_tunnel": "t",
                   "secondary_ipsec_tunnel": "t2"}),
        );
        assert!(validate(Folder::RemoteNetworks, &single).is_ok());

        assert_eq!(
            group_of(
                ResourceKind::RemoteNetwork,
                Folder::RemoteNetworks,
                json!({"name": "rn", "region": "r"})
            ),
            "tunnel"
        );
        assert_eq!(
            group_of(
                ResourceKind::RemoteNetwork,
                Folder::RemoteNetworks,
                json!({"name": "rn", "region": "r",
                       "secondary_ipsec_tunnel": "t2",
                       "ecmp_tunnels": [{"ipsec_tunnel": "e1"}]})
            ),
            "secondary_tunnel"
        );
    }

    #[test]
    fn test_every_schema_path_is_known() {
        // A fully populated descriptor per kind must report every tabled path.
        let full: Vec<(ResourceKind, Value)> = vec![
            (
                ResourceKind::Address,
                json!({"name": "a", "description": "d", "fqdn": "f", "ip_netmask": "n",
                       "ip_range": "r", "ip_wildcard": "w"}),
            ),
            (
                ResourceKind::AddressGroup,
                json!({"name": "g", "description": "d", "static": ["a"], "dynamic": {"filter": "f"}}),
            ),
            (
                ResourceKind::IkeGateway,
                json!({
                    "name": "gw",
                    "peer_id": {"id": "i", "type": "keyid"},
                    "authentication": {"pre_shared_key": "k", "certificate": {}},
                    "peer_address": {"ip": "i", "fqdn": "f", "dynamic": true}
                }),
            ),
            (
                ResourceKind::IpsecTunnel,
                json!({"name": "t", "auto_key": {"ike_gateway": [{"name": "g"}], "ipsec_crypto_profile": "p"}}),
            ),
            (
                ResourceKind::ServiceConnection,
                json!({"name": "s", "ipsec_tunnel": "t", "region": "r", "subnets": ["n"],
                       "nat_pool": "p", "source_nat": true}),
            ),
            (
                ResourceKind::RemoteNetwork,
                json!({"name": "r", "region": "r", "ipsec_tunnel": "t",
                       "secondary_ipsec_tunnel": "s", "ecmp_tunnels": [{"ipsec_tunnel": "e"}]}),
            ),
        ];

        for (kind, fields) in full {
            let d = descriptor(kind, fields);
            let schema = schema_for(kind);
            assert_eq!(schema.kind, kind);
            let paths = schema
                .required
                .iter()
                .chain(schema.groups.iter().flat_map(|g| g.members.iter()));
            for path in paths {
                assert!(d.fields().populated(path), "{kind}: {path} not recognised");
            }
        }
    }
}
