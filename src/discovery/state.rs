//! Aggregate discovery screen state.

use serde::Serialize;

use super::async_result::AsyncResult;
use super::pid::{PidKind, PidState};
use crate::error::Result;

/// Snapshot of the discovery settings screen
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DiscoverySettingsState {
    /// Bound identity server, `None` when none is configured
    pub identity_server: Option<String>,
    /// Email addresses of the account
    pub email_list: AsyncResult<Vec<PidState>>,
    /// Phone numbers of the account
    pub phone_numbers_list: AsyncResult<Vec<PidState>>,
}

impl DiscoverySettingsState {
    /// Initial state on screen entry
    pub fn new(identity_server: Option<String>) -> Self {
        Self {
            identity_server: normalize_server(identity_server),
            ..Self::default()
        }
    }

    /// Whether an identity server is bound
    pub fn has_identity_server(&self) -> bool {
        self.identity_server.is_some()
    }

    /// The list holding identifiers of `kind`
    pub fn list(&self, kind: PidKind) -> &AsyncResult<Vec<PidState>> {
        match kind {
            PidKind::Email => &self.email_list,
            PidKind::Phone => &self.phone_numbers_list,
        }
    }

    /// Find a loaded identifier by value
    pub fn find(&self, kind: PidKind, value: &str) -> Option<&PidState> {
        self.list(kind)
            .value()
            .and_then(|pids| pids.iter().find(|pid| pid.value() == value))
    }

    /// Encode to JSON for host UIs
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Blank URLs count as "no identity server".
pub(crate) fn normalize_server(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::pid::SharedState;

    #[test]
    fn test_new_state_is_uninitialized() {
        let state = DiscoverySettingsState::new(Some("https://is.example.org".into()));

        assert!(state.has_identity_server());
        assert_eq!(state.email_list, AsyncResult::Uninitialized);
        assert_eq!(state.phone_numbers_list, AsyncResult::Uninitialized);
    }

    #[test]
    fn test_blank_server_is_unbound() {
        let state = DiscoverySettingsState::new(Some("   ".into()));
        assert!(!state.has_identity_server());
    }

    #[test]
    fn test_find_by_value() {
        let mut state = DiscoverySettingsState::new(None);
        state.phone_numbers_list = AsyncResult::Success(vec![
            PidState::phone("447700900000", SharedState::Shared),
            PidState::phone("33612345678", SharedState::NotShared),
        ]);

        let found = state.find(PidKind::Phone, "33612345678").unwrap();
        assert_eq!(found.shared_state, SharedState::NotShared);
        assert!(state.find(PidKind::Email, "33612345678").is_none());
    }

    #[test]
    fn test_json_snapshot() {
        let mut state = DiscoverySettingsState::new(Some("https://is.example.org".into()));
        state.email_list = AsyncResult::Loading;

        let json: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
        assert_eq!(json["identity_server"], "https://is.example.org");
        assert_eq!(json["email_list"]["status"], "loading");
        assert_eq!(json["phone_numbers_list"]["status"], "uninitialized");
    }
}
