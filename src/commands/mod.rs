use anyhow::{Context as AnyhowContext, Result};
use sasekit::HttpSession;

use crate::Context;
use crate::config::Manifest;
use crate::progress;

// Manifest commands
pub mod apply;
pub mod plan;
pub mod validate;

// Single-resource commands
pub mod ensure;
pub mod list;
pub mod push;

/// Authenticate with the manifest's provider settings and open a session
///
/// Includes the settle delay, so the first call on the session is accepted.
pub fn connect(ctx: &Context, manifest: &Manifest) -> Result<HttpSession> {
    let config = manifest.provider.session_config(&ctx.provider)?;

    let pb = progress::spinner("Authenticating...", ctx.interactive());
    let session = HttpSession::connect(&config);
    pb.finish_and_clear();

    session.map_err(declarative::Error::from).context("Could not open a session")
}
