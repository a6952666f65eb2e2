//! # sasekit
//!
//! Blocking client for the Prisma Access configuration API.
//!
//! This crate provides:
//! - The closed vocabularies the API is addressed with ([`ResourceKind`], [`Folder`])
//! - OAuth2 client-credentials token acquisition with the required settle delay
//! - The [`Session`] trait with list/create/delete/push verbs
//! - [`HttpSession`] over ureq and [`MockSession`] for tests
//!
//! Nothing here retries. A failed call is reported once.
//!
//! ## Example
//!
//! ```no_run
//! use sasekit::{Credentials, Folder, HttpSession, ResourceKind, Session, SessionConfig};
//! use serde_json::json;
//!
//! let credentials = Credentials::new("svc@1.iam.panserviceaccount.com", "secret", "1");
//! let session = HttpSession::connect(&SessionConfig::new(credentials)).unwrap();
//!
//! let response = session
//!     .create(ResourceKind::Tag, Folder::Shared, &json!({"name": "prod", "color": "Red"}))
//!     .unwrap();
//! println!("{} {}", response.status, response.body);
//! ```
//!
//! ## Collections
//!
//! | Kind              | Path under `/sse/config/v1/` |
//! |-------------------|------------------------------|
//! | Address           | `addresses`                  |
//! | AddressGroup      | `address-groups`             |
//! | Tag               | `tags`                       |
//! | IkeGateway        | `ike-gateways`               |
//! | IpsecTunnel       | `ipsec-tunnels`              |
//! | ServiceConnection | `service-connections`        |
//! | RemoteNetwork     | `remote-networks`            |

#![warn(clippy::all)]

pub mod auth;
pub mod error;
pub mod session;
pub mod types;

pub use auth::{AccessToken, Credentials, TokenClient, settle};
pub use error::{Error, ErrorCategory, Result};
pub use session::http::{HttpSession, SessionConfig};
pub use session::{MockSession, PushRecord, Session, Verb};
pub use types::{ApiResponse, Folder, RemoteObject, ResourceKind, STATUS_CREATED, STATUS_OK};
