//! OAuth2 client-credentials authentication.
//!
//! Access tokens are fetched from the identity endpoint with HTTP basic auth.
//! The token's validity start is only second-granular on the server side, so
//! a request sent in the same second the token was issued can be rejected as
//! "not yet valid". [`settle`] is the fixed wait that bridges that gap; it is
//! not a retry.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Default identity endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://auth.apps.paloaltonetworks.com/am/oauth2/access_token";

/// Default wait between token issue and the first authenticated call.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1100);

/// Service account credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Tenant service group the token is scoped to.
    pub tsg_id: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        tsg_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            tsg_id: tsg_id.into(),
        }
    }

    /// Check that every field is filled in.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("tsg_id", &self.tsg_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "missing provider settings: {}",
                missing.join(", ")
            )))
        }
    }

    /// The OAuth2 scope string for this tenant.
    #[must_use]
    pub fn scope(&self) -> String {
        format!("profile tsg_id:{} email", self.tsg_id)
    }

    /// Value of the `Authorization` header for the token request.
    #[must_use]
    pub fn basic_auth(&self) -> String {
        let pair = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(pair))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tsg_id", &self.tsg_id)
            .finish()
    }
}

/// A bearer token.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    /// The token itself.
    pub access_token: String,
    /// Lifetime in seconds, if reported.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl AccessToken {
    /// Value of the `Authorization` header for API requests.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Client for the identity endpoint.
pub struct TokenClient {
    agent: ureq::Agent,
    token_url: String,
}

impl TokenClient {
    /// Create a client for the given token URL.
    #[must_use]
    pub fn new(token_url: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            token_url: token_url.into(),
        }
    }

    /// The token URL this client posts to.
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Request a token with the client-credentials grant.
    pub fn fetch(&self, credentials: &Credentials) -> Result<AccessToken> {
        credentials.validate()?;
        log::debug!(
            "requesting access token for tsg {} from {}",
            credentials.tsg_id,
            self.token_url
        );

        let scope = credentials.scope();
        let mut response = self
            .agent
            .post(&self.token_url)
            .header("Authorization", &credentials.basic_auth())
            .header("Accept", "application/json")
            .send_form([("grant_type", "client_credentials"), ("scope", scope.as_str())])
            .map_err(|e| Error::auth(format!("token request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| Error::auth(format!("could not read token response: {e}")))?;

        parse_token_response(status, &body)
    }
}

impl Default for TokenClient {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_URL)
    }
}

fn parse_token_response(status: u16, body: &str) -> Result<AccessToken> {
    if status != 200 {
        return Err(Error::auth(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    let token: AccessToken = serde_json::from_str(body)
        .map_err(|e| Error::auth(format!("malformed token response: {e}")))?;

    if token.access_token.is_empty() {
        return Err(Error::auth("token endpoint returned an empty access token"));
    }

    Ok(token)
}

/// Block for the settle delay after a token was issued.
pub fn settle(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    log::debug!("waiting {}ms for the new token to become valid", delay.as_millis());
    std::thread::sleep(delay);
}
