//! Core types for the configuration API.
//!
//! This module contains the closed vocabularies the API is addressed with
//! (resource kinds and folders) and the shapes of what comes back (remote
//! objects and raw responses).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Success status for reads, deletes and pushes.
pub const STATUS_OK: u16 = 200;

/// Success status for creates.
pub const STATUS_CREATED: u16 = 201;

/// Resource kinds managed through the configuration API.
///
/// Each kind has its own collection endpoint, its own set of folders it may
/// live in, and a rank used to order staged changes so that referenced
/// objects exist before the objects that name them.
///
/// # Example
///
/// ```
/// use sasekit::ResourceKind;
///
/// let kind: ResourceKind = "ike_gateway".parse().unwrap();
/// assert_eq!(kind.collection(), "ike-gateways");
/// assert!(kind.dependency_rank() < ResourceKind::IpsecTunnel.dependency_rank());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Address object (fqdn, netmask, range or wildcard).
    Address,
    /// Static or dynamic group of addresses.
    AddressGroup,
    /// Tag used to label other objects.
    Tag,
    /// IKE gateway (phase 1 peer).
    IkeGateway,
    /// IPsec tunnel bound to one or more IKE gateways.
    IpsecTunnel,
    /// Service connection terminating an IPsec tunnel.
    ServiceConnection,
    /// Remote network terminating an IPsec tunnel.
    RemoteNetwork,
}

const OBJECT_FOLDERS: &[Folder] = &[
    Folder::GlobalProtect,
    Folder::MobileUsers,
    Folder::RemoteNetworks,
    Folder::ServiceConnections,
    Folder::Shared,
];

const NETWORK_FOLDERS: &[Folder] = &[
    Folder::MobileUsers,
    Folder::MobileUsersContainer,
    Folder::MobileUsersExplicitProxy,
    Folder::RemoteNetworks,
    Folder::ServiceConnections,
    Folder::Shared,
];

impl ResourceKind {
    /// Identifier used in manifests and on the command line.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::AddressGroup => "address_group",
            Self::Tag => "tag",
            Self::IkeGateway => "ike_gateway",
            Self::IpsecTunnel => "ipsec_tunnel",
            Self::ServiceConnection => "service_connection",
            Self::RemoteNetwork => "remote_network",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Address => "Address",
            Self::AddressGroup => "Address Group",
            Self::Tag => "Tag",
            Self::IkeGateway => "IKE Gateway",
            Self::IpsecTunnel => "IPsec Tunnel",
            Self::ServiceConnection => "Service Connection",
            Self::RemoteNetwork => "Remote Network",
        }
    }

    /// Collection segment under `/sse/config/v1/`.
    #[must_use]
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Address => "addresses",
            Self::AddressGroup => "address-groups",
            Self::Tag => "tags",
            Self::IkeGateway => "ike-gateways",
            Self::IpsecTunnel => "ipsec-tunnels",
            Self::ServiceConnection => "service-connections",
            Self::RemoteNetwork => "remote-networks",
        }
    }

    /// Folders objects of this kind may be placed in.
    #[must_use]
    pub fn allowed_folders(&self) -> &'static [Folder] {
        match self {
            Self::Address | Self::AddressGroup | Self::Tag => OBJECT_FOLDERS,
            Self::IkeGateway | Self::IpsecTunnel | Self::ServiceConnection | Self::RemoteNetwork => {
                NETWORK_FOLDERS
            }
        }
    }

    /// Whether `folder` is a valid location for this kind.
    #[must_use]
    pub fn allows(&self, folder: Folder) -> bool {
        self.allowed_folders().contains(&folder)
    }

    /// Position in the reference graph.
    ///
    /// A kind only ever references kinds with a strictly lower rank.
    #[must_use]
    pub fn dependency_rank(&self) -> u8 {
        match self {
            Self::Tag => 0,
            Self::Address | Self::IkeGateway => 1,
            Self::AddressGroup | Self::IpsecTunnel => 2,
            Self::ServiceConnection | Self::RemoteNetwork => 3,
        }
    }

    /// All supported kinds.
    #[must_use]
    pub fn all() -> &'static [ResourceKind] {
        &[
            Self::Address,
            Self::AddressGroup,
            Self::Tag,
            Self::IkeGateway,
            Self::IpsecTunnel,
            Self::ServiceConnection,
            Self::RemoteNetwork,
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == normalized || kind.collection().replace('-', "_") == normalized)
            .ok_or_else(|| Error::Config(format!("unknown resource kind '{s}'")))
    }
}

/// Deployment location ("folder") a resource lives in.
///
/// The set is closed; anything else is rejected when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Folder {
    #[serde(rename = "Shared")]
    Shared,
    #[serde(rename = "Mobile Users")]
    MobileUsers,
    #[serde(rename = "Mobile Users Container")]
    MobileUsersContainer,
    #[serde(rename = "Mobile Users Explicit Proxy")]
    MobileUsersExplicitProxy,
    #[serde(rename = "Remote Networks")]
    RemoteNetworks,
    #[serde(rename = "Service Connections")]
    ServiceConnections,
    #[serde(rename = "GlobalProtect")]
    GlobalProtect,
}

impl Folder {
    /// The literal the API uses for this folder.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shared => "Shared",
            Self::MobileUsers => "Mobile Users",
            Self::MobileUsersContainer => "Mobile Users Container",
            Self::MobileUsersExplicitProxy => "Mobile Users Explicit Proxy",
            Self::RemoteNetworks => "Remote Networks",
            Self::ServiceConnections => "Service Connections",
            Self::GlobalProtect => "GlobalProtect",
        }
    }

    /// All folders.
    #[must_use]
    pub fn all() -> &'static [Folder] {
        &[
            Self::Shared,
            Self::MobileUsers,
            Self::MobileUsersContainer,
            Self::MobileUsersExplicitProxy,
            Self::RemoteNetworks,
            Self::ServiceConnections,
            Self::GlobalProtect,
        ]
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Folder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|folder| folder.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::all().iter().map(Folder::as_str).collect();
                Error::Config(format!(
                    "unknown folder '{s}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

/// An object as stored by the platform.
///
/// The identity is assigned remotely and only ever copied from a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteObject {
    /// Remote-assigned identity.
    pub id: String,
    /// Name, unique within a folder.
    pub name: String,
    /// Folder reported by the API, if any.
    pub folder: Option<String>,
    /// The full object as returned by the API.
    pub raw: Value,
}

impl RemoteObject {
    /// Decode one entry of a listing.
    pub fn from_value(raw: Value) -> Result<Self> {
        let field = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);

        let id = field("id")
            .ok_or_else(|| Error::InvalidResponse(format!("object without id: {raw}")))?;
        let name = field("name")
            .ok_or_else(|| Error::InvalidResponse(format!("object without name: {raw}")))?;
        let folder = field("folder");

        Ok(Self {
            id,
            name,
            folder,
            raw,
        })
    }
}

/// Raw outcome of one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ApiResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status matches the expected acknowledgment.
    #[must_use]
    pub fn acknowledged(&self, expected: u16) -> bool {
        self.status == expected
    }

    /// The body as JSON, or as a JSON string if it is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}
