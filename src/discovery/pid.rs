//! Per-identifier sharing state.

use serde::{Deserialize, Serialize};

/// Kind of third-party identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PidKind {
    /// Email address
    Email,
    /// Phone number (stored as raw digits, no leading `+`)
    Phone,
}

impl PidKind {
    /// Medium name used by identity servers
    pub fn as_str(&self) -> &'static str {
        match self {
            PidKind::Email => "email",
            PidKind::Phone => "msisdn",
        }
    }
}

/// Whether an identifier is discoverable through the identity server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SharedState {
    /// Confirmation not resolved yet
    Unknown,
    /// Bound to the identity server
    Shared,
    /// Not bound
    NotShared,
    /// Binding requested, waiting for the user to confirm (email link, SMS)
    Pending,
}

impl SharedState {
    /// Whether the row shows an interactive switch
    pub fn is_toggleable(&self) -> bool {
        matches!(self, SharedState::Shared | SharedState::NotShared)
    }
}

/// Sharing state of one email address or phone number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PidState {
    value: String,
    kind: PidKind,
    /// Current sharing state
    pub shared_state: SharedState,
}

impl PidState {
    /// Create a new identifier state
    pub fn new(kind: PidKind, value: impl Into<String>, shared_state: SharedState) -> Self {
        Self {
            value: value.into(),
            kind,
            shared_state,
        }
    }

    /// Shorthand for an email identifier
    pub fn email(value: impl Into<String>, shared_state: SharedState) -> Self {
        Self::new(PidKind::Email, value, shared_state)
    }

    /// Shorthand for a phone identifier
    pub fn phone(value: impl Into<String>, shared_state: SharedState) -> Self {
        Self::new(PidKind::Phone, value, shared_state)
    }

    /// Raw identifier value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Identifier kind
    pub fn kind(&self) -> PidKind {
        self.kind
    }
}
