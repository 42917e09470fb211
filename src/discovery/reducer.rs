//! # Discovery State Reducer
//!
//! Pure transition function over [`DiscoverySettingsState`].
//!
//! ```text
//! Loader result ─┐
//!                ├──► reduce(state, event) ──► Reduction { state, intent }
//! User toggle ───┘                                          │
//!                                                           ▼
//!                                   coordinator calls the identity server,
//!                                   the outcome re-enters as a list load
//! ```
//!
//! Toggle events never change state. They are validated against the loaded
//! list and either passed outward as a [`ToggleIntent`] or dropped.

use super::async_result::AsyncResult;
use super::pid::{PidKind, PidState, SharedState};
use super::state::{normalize_server, DiscoverySettingsState};
use crate::error::Error;

/// Events applied to the discovery state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// The identity server binding was (re)read
    IdentityServerLoaded(Option<String>),
    /// Email list fetch started
    EmailListLoading,
    /// Phone list fetch started
    PhoneListLoading,
    /// Email list fetched
    EmailListLoaded(Vec<PidState>),
    /// Phone list fetched
    PhoneListLoaded(Vec<PidState>),
    /// Email list fetch failed
    EmailListFailed(Error),
    /// Phone list fetch failed
    PhoneListFailed(Error),
    /// User asked to share an identifier
    ShareRequested {
        /// Identifier kind
        kind: PidKind,
        /// Raw identifier value
        value: String,
    },
    /// User asked to stop sharing an identifier
    RevokeRequested {
        /// Identifier kind
        kind: PidKind,
        /// Raw identifier value
        value: String,
    },
}

impl DiscoveryEvent {
    /// Loading event for `kind`
    pub fn loading(kind: PidKind) -> Self {
        match kind {
            PidKind::Email => DiscoveryEvent::EmailListLoading,
            PidKind::Phone => DiscoveryEvent::PhoneListLoading,
        }
    }

    /// Terminal load event for `kind`
    pub fn loaded(kind: PidKind, result: crate::error::Result<Vec<PidState>>) -> Self {
        match (kind, result) {
            (PidKind::Email, Ok(pids)) => DiscoveryEvent::EmailListLoaded(pids),
            (PidKind::Phone, Ok(pids)) => DiscoveryEvent::PhoneListLoaded(pids),
            (PidKind::Email, Err(err)) => DiscoveryEvent::EmailListFailed(err),
            (PidKind::Phone, Err(err)) => DiscoveryEvent::PhoneListFailed(err),
        }
    }
}

/// Identity server call requested by a validated toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleIntent {
    /// Bind the identifier
    Share {
        /// Identifier kind
        kind: PidKind,
        /// Raw identifier value
        value: String,
    },
    /// Unbind the identifier
    Revoke {
        /// Identifier kind
        kind: PidKind,
        /// Raw identifier value
        value: String,
    },
}

/// Output of one reducer step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    /// Next state
    pub state: DiscoverySettingsState,
    /// Call to dispatch outward, if the event was a valid toggle
    pub intent: Option<ToggleIntent>,
}

impl Reduction {
    fn state(state: DiscoverySettingsState) -> Self {
        Self {
            state,
            intent: None,
        }
    }
}

/// Apply `event` to `state`.
pub fn reduce(state: &DiscoverySettingsState, event: DiscoveryEvent) -> Reduction {
    let mut next = state.clone();

    match event {
        DiscoveryEvent::IdentityServerLoaded(url) => {
            next.identity_server = normalize_server(url);
            Reduction::state(next)
        }
        DiscoveryEvent::EmailListLoading => {
            next.email_list = AsyncResult::Loading;
            Reduction::state(next)
        }
        DiscoveryEvent::PhoneListLoading => {
            next.phone_numbers_list = AsyncResult::Loading;
            Reduction::state(next)
        }
        DiscoveryEvent::EmailListLoaded(pids) => {
            next.email_list = AsyncResult::Success(pids);
            Reduction::state(next)
        }
        DiscoveryEvent::PhoneListLoaded(pids) => {
            next.phone_numbers_list = AsyncResult::Success(pids);
            Reduction::state(next)
        }
        DiscoveryEvent::EmailListFailed(err) => {
            next.email_list = AsyncResult::Failure(err);
            Reduction::state(next)
        }
        DiscoveryEvent::PhoneListFailed(err) => {
            next.phone_numbers_list = AsyncResult::Failure(err);
            Reduction::state(next)
        }
        DiscoveryEvent::ShareRequested { kind, value } => {
            let intent = toggle_target(state, kind, &value, SharedState::NotShared)
                .then(|| ToggleIntent::Share { kind, value });
            Reduction {
                state: next,
                intent,
            }
        }
        DiscoveryEvent::RevokeRequested { kind, value } => {
            let intent = toggle_target(state, kind, &value, SharedState::Shared)
                .then(|| ToggleIntent::Revoke { kind, value });
            Reduction {
                state: next,
                intent,
            }
        }
    }
}

/// Whether `value` is loaded and currently in the state a toggle starts from.
fn toggle_target(
    state: &DiscoverySettingsState,
    kind: PidKind,
    value: &str,
    expected: SharedState,
) -> bool {
    // Lists loaded under a previous binding are not actionable
    if !state.has_identity_server() {
        tracing::warn!("Dropping {:?} toggle: no identity server bound", kind);
        return false;
    }

    match state.find(kind, value) {
        Some(pid) if pid.shared_state == expected => true,
        Some(pid) => {
            tracing::warn!(
                "Dropping {:?} toggle: identifier is {:?}, expected {:?}",
                kind,
                pid.shared_state,
                expected
            );
            false
        }
        None => {
            tracing::warn!("Dropping {:?} toggle: identifier not in loaded list", kind);
            false
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bound_state() -> DiscoverySettingsState {
        let mut state = DiscoverySettingsState::new(Some("https://is.example.org".into()));
        state.email_list = AsyncResult::Success(vec![
            PidState::email("a@b.com", SharedState::NotShared),
            PidState::email("c@d.com", SharedState::Shared),
            PidState::email("e@f.com", SharedState::Pending),
        ]);
        state
    }

    #[test]
    fn test_identity_server_loaded_keeps_lists() {
        let state = bound_state();
        let reduction = reduce(&state, DiscoveryEvent::IdentityServerLoaded(None));

        assert!(reduction.state.identity_server.is_none());
        assert_eq!(reduction.state.email_list, state.email_list);
        assert!(reduction.intent.is_none());
    }

    #[test]
    fn test_list_lifecycle() {
        let state = DiscoverySettingsState::new(Some("https://is.example.org".into()));

        let loading = reduce(&state, DiscoveryEvent::PhoneListLoading).state;
        assert!(loading.phone_numbers_list.is_loading());

        let loaded = reduce(&loading, DiscoveryEvent::PhoneListLoaded(vec![])).state;
        assert_eq!(loaded.phone_numbers_list, AsyncResult::Success(vec![]));

        let failed = reduce(
            &loaded,
            DiscoveryEvent::PhoneListFailed(Error::LoadFailed("offline".into())),
        )
        .state;
        assert_eq!(failed.phone_numbers_list.error().map(Error::code), Some(100));
        assert_eq!(failed.email_list, AsyncResult::Uninitialized);
    }

    #[test]
    fn test_share_request_passes_through() {
        let state = bound_state();
        let reduction = reduce(
            &state,
            DiscoveryEvent::ShareRequested {
                kind: PidKind::Email,
                value: "a@b.com".into(),
            },
        );

        assert_eq!(reduction.state, state);
        assert_eq!(
            reduction.intent,
            Some(ToggleIntent::Share {
                kind: PidKind::Email,
                value: "a@b.com".into()
            })
        );
    }

    #[test]
    fn test_revoke_request_passes_through() {
        let state = bound_state();
        let reduction = reduce(
            &state,
            DiscoveryEvent::RevokeRequested {
                kind: PidKind::Email,
                value: "c@d.com".into(),
            },
        );

        assert!(matches!(reduction.intent, Some(ToggleIntent::Revoke { .. })));
    }

    #[test]
    fn test_toggle_on_missing_identifier_is_dropped() {
        let state = bound_state();
        let reduction = reduce(
            &state,
            DiscoveryEvent::ShareRequested {
                kind: PidKind::Email,
                value: "gone@b.com".into(),
            },
        );

        assert_eq!(reduction.state, state);
        assert!(reduction.intent.is_none());
    }

    #[test]
    fn test_toggle_while_loading_is_dropped() {
        let mut state = bound_state();
        state.email_list = AsyncResult::Loading;

        let reduction = reduce(
            &state,
            DiscoveryEvent::ShareRequested {
                kind: PidKind::Email,
                value: "a@b.com".into(),
            },
        );
        assert!(reduction.intent.is_none());
    }

    #[test]
    fn test_toggle_on_pending_is_dropped() {
        let state = bound_state();
        let share = reduce(
            &state,
            DiscoveryEvent::ShareRequested {
                kind: PidKind::Email,
                value: "e@f.com".into(),
            },
        );
        let revoke = reduce(
            &state,
            DiscoveryEvent::RevokeRequested {
                kind: PidKind::Email,
                value: "e@f.com".into(),
            },
        );

        assert!(share.intent.is_none());
        assert!(revoke.intent.is_none());
    }

    #[test]
    fn test_toggle_matches_kind() {
        let state = bound_state();
        let reduction = reduce(
            &state,
            DiscoveryEvent::ShareRequested {
                kind: PidKind::Phone,
                value: "a@b.com".into(),
            },
        );
        assert!(reduction.intent.is_none());
    }

    #[test]
    fn test_toggle_after_disconnect_is_dropped() {
        let state = bound_state();
        let unbound = reduce(&state, DiscoveryEvent::IdentityServerLoaded(None)).state;

        let share = reduce(
            &unbound,
            DiscoveryEvent::ShareRequested {
                kind: PidKind::Email,
                value: "a@b.com".into(),
            },
        );
        let revoke = reduce(
            &unbound,
            DiscoveryEvent::RevokeRequested {
                kind: PidKind::Email,
                value: "c@d.com".into(),
            },
        );

        assert!(share.intent.is_none());
        assert!(revoke.intent.is_none());
        assert_eq!(share.state, unbound);
    }

    fn arb_shared_state() -> impl Strategy<Value = SharedState> {
        prop_oneof![
            Just(SharedState::Unknown),
            Just(SharedState::Shared),
            Just(SharedState::NotShared),
            Just(SharedState::Pending),
        ]
    }

    fn arb_emails() -> impl Strategy<Value = Vec<PidState>> {
        prop::collection::vec(("[a-z]{1,6}@[a-z]{1,4}\\.org", arb_shared_state()), 0..5)
            .prop_map(|pids| {
                pids.into_iter()
                    .map(|(value, shared)| PidState::email(value, shared))
                    .collect()
            })
    }

    fn arb_kind() -> impl Strategy<Value = PidKind> {
        prop_oneof![Just(PidKind::Email), Just(PidKind::Phone)]
    }

    fn arb_event() -> impl Strategy<Value = DiscoveryEvent> {
        let value = "[a-z]{1,6}@[a-z]{1,4}\\.org";
        prop_oneof![
            prop::option::of(prop_oneof![
                Just("https://is.example.org".to_string()),
                Just("   ".to_string()),
            ])
            .prop_map(DiscoveryEvent::IdentityServerLoaded),
            arb_kind().prop_map(DiscoveryEvent::loading),
            (arb_kind(), arb_emails()).prop_map(|(kind, pids)| DiscoveryEvent::loaded(kind, Ok(pids))),
            arb_kind().prop_map(|kind| {
                DiscoveryEvent::loaded(kind, Err(Error::LoadFailed("offline".into())))
            }),
            (arb_kind(), value)
                .prop_map(|(kind, value)| DiscoveryEvent::ShareRequested { kind, value }),
            (arb_kind(), value)
                .prop_map(|(kind, value)| DiscoveryEvent::RevokeRequested { kind, value }),
        ]
    }

    proptest! {
        #[test]
        fn prop_reduce_is_deterministic(emails in arb_emails(), event in arb_event()) {
            let mut state = bound_state();
            state.email_list = AsyncResult::Success(emails);

            prop_assert_eq!(reduce(&state, event.clone()), reduce(&state, event));
        }

        #[test]
        fn prop_events_sequence_is_deterministic(events in prop::collection::vec(arb_event(), 0..8)) {
            let run = |events: &[DiscoveryEvent]| {
                events.iter().fold(bound_state(), |state, event| reduce(&state, event.clone()).state)
            };

            prop_assert_eq!(run(&events), run(&events));
        }

        #[test]
        fn prop_share_of_absent_value_leaves_state(emails in arb_emails()) {
            let mut state = bound_state();
            state.email_list = AsyncResult::Success(emails);
            // Uppercase never matches the generated lowercase values
            let event = DiscoveryEvent::ShareRequested { kind: PidKind::Email, value: "ABSENT@X.ORG".into() };

            let reduction = reduce(&state, event);
            prop_assert_eq!(reduction.state, state);
            prop_assert!(reduction.intent.is_none());
        }
    }
}
