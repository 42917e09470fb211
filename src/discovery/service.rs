//! Identity server collaborator contract.
//!
//! The client SDK owns the session, performs the HTTP calls and persists the
//! binding. This crate only consumes it.

use async_trait::async_trait;

use super::pid::{PidKind, SharedState};
use crate::error::Result;

/// Identity-resolution client as seen by the discovery screen
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Currently bound identity server, if any
    fn identity_server_url(&self) -> Option<String>;

    /// Bind a new identity server, or disconnect with `None`
    async fn set_identity_server(&self, url: Option<String>) -> Result<()>;

    /// Associate an identifier with the account on the identity server
    async fn bind_identifier(&self, kind: PidKind, value: &str) -> Result<SharedState>;

    /// Remove the association of an identifier
    async fn unbind_identifier(&self, kind: PidKind, value: &str) -> Result<SharedState>;

    /// Identifiers of `kind` on the account with their sharing state
    async fn list_bound_identifiers(&self, kind: PidKind) -> Result<Vec<(String, SharedState)>>;
}
