//! # Discovery Coordinator
//!
//! Owns the discovery state and funnels every mutation through the reducer.
//!
//! ```text
//! ┌──────────────┐   DiscoveryIntent   ┌──────────────────────┐
//! │ Controller   │ ──── (mpsc) ──────► │ DiscoveryCoordinator │
//! │ + Listener   │                     │                      │
//! └──────▲───────┘                     │  reduce() ◄── events │
//!        │        DiscoverySettings    │     │                │
//!        └──────── State (watch) ◄─────┤     ▼                │
//!                                      │  IdentityService     │
//!                                      └──────────────────────┘
//! ```
//!
//! All reducer applications go through one `watch` sender, so no two of them
//! interleave. List loads are tagged with a generation number and a result
//! that is no longer the latest request for its list is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::listener::DiscoveryIntent;
use super::pid::{PidKind, PidState};
use super::reducer::{reduce, DiscoveryEvent, ToggleIntent};
use super::service::IdentityService;
use super::state::DiscoverySettingsState;
use crate::config::CoreConfig;

/// Screen the host should navigate to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Identity server picker
    IdentityServerPicker {
        /// Server currently bound
        current: Option<String>,
        /// Server to prefill
        suggested: Option<String>,
    },
    /// Flow replacing the bound server
    ChangeIdentityServer {
        /// Server currently bound
        current: Option<String>,
        /// Server to prefill
        suggested: Option<String>,
    },
}

/// Serializes discovery state updates and talks to the identity server
pub struct DiscoveryCoordinator<S: IdentityService + ?Sized> {
    service: Arc<S>,
    config: CoreConfig,
    state: watch::Sender<DiscoverySettingsState>,
    email_generation: AtomicU64,
    phone_generation: AtomicU64,
}

impl<S: IdentityService + ?Sized> DiscoveryCoordinator<S> {
    /// Create a coordinator with the binding read from `service`
    pub fn new(service: Arc<S>, config: CoreConfig) -> Self {
        let initial = DiscoverySettingsState::new(service.identity_server_url());
        let (state, _) = watch::channel(initial);

        Self {
            service,
            config,
            state,
            email_generation: AtomicU64::new(0),
            phone_generation: AtomicU64::new(0),
        }
    }

    /// Latest state snapshot
    pub fn snapshot(&self) -> DiscoverySettingsState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<DiscoverySettingsState> {
        self.state.subscribe()
    }

    /// Apply one event. Returns the identity server call to make, if any.
    pub fn apply(&self, event: DiscoveryEvent) -> Option<ToggleIntent> {
        let mut intent = None;

        self.state.send_if_modified(|state| {
            let reduction = reduce(state, event);
            intent = reduction.intent;
            if reduction.state == *state {
                false
            } else {
                *state = reduction.state;
                true
            }
        });

        intent
    }

    /// Re-read the binding and, when bound, reload both lists.
    pub async fn refresh(&self) {
        self.apply(DiscoveryEvent::IdentityServerLoaded(
            self.service.identity_server_url(),
        ));

        if self.snapshot().has_identity_server() {
            futures::join!(self.load_list(PidKind::Email), self.load_list(PidKind::Phone));
        } else {
            // Results of loads started while bound are no longer wanted
            self.email_generation.fetch_add(1, Ordering::SeqCst);
            self.phone_generation.fetch_add(1, Ordering::SeqCst);
            tracing::debug!("No identity server bound, skipping identifier loads");
        }
    }

    /// Handle one user intent. Navigation intents are returned to the host.
    pub async fn handle_intent(&self, intent: DiscoveryIntent) -> Option<Navigation> {
        tracing::debug!("Handling discovery intent: {:?}", intent);

        match intent {
            DiscoveryIntent::SelectIdentityServer => Some(Navigation::IdentityServerPicker {
                current: self.snapshot().identity_server,
                suggested: self.config.default_identity_server.clone(),
            }),
            DiscoveryIntent::ChangeIdentityServer => Some(Navigation::ChangeIdentityServer {
                current: self.snapshot().identity_server,
                suggested: self.config.default_identity_server.clone(),
            }),
            DiscoveryIntent::SetIdentityServer(url) => {
                self.set_identity_server(url).await;
                None
            }
            DiscoveryIntent::ShareEmail(value) => {
                self.toggle(DiscoveryEvent::ShareRequested {
                    kind: PidKind::Email,
                    value,
                })
                .await;
                None
            }
            DiscoveryIntent::RevokeEmail(value) => {
                self.toggle(DiscoveryEvent::RevokeRequested {
                    kind: PidKind::Email,
                    value,
                })
                .await;
                None
            }
            DiscoveryIntent::SharePhoneNumber(value) => {
                self.toggle(DiscoveryEvent::ShareRequested {
                    kind: PidKind::Phone,
                    value,
                })
                .await;
                None
            }
            DiscoveryIntent::RevokePhoneNumber(value) => {
                self.toggle(DiscoveryEvent::RevokeRequested {
                    kind: PidKind::Phone,
                    value,
                })
                .await;
                None
            }
        }
    }

    /// Process intents until the channel closes.
    ///
    /// Refreshes once on start, the way the screen loads on entry.
    pub async fn run(
        &self,
        mut intents: mpsc::UnboundedReceiver<DiscoveryIntent>,
        navigation: mpsc::UnboundedSender<Navigation>,
    ) {
        tracing::info!("Discovery coordinator started");
        self.refresh().await;

        while let Some(intent) = intents.recv().await {
            if let Some(target) = self.handle_intent(intent).await {
                if navigation.send(target).is_err() {
                    tracing::warn!("Navigation receiver dropped");
                }
            }
        }

        tracing::info!("Discovery coordinator stopped");
    }

    async fn set_identity_server(&self, url: Option<String>) {
        match self.service.set_identity_server(url.clone()).await {
            Ok(()) => tracing::info!("Identity server set to {:?}", url),
            Err(e) => tracing::warn!("Failed to set identity server: {}", e),
        }
        self.refresh().await;
    }

    async fn toggle(&self, event: DiscoveryEvent) {
        let Some(intent) = self.apply(event) else {
            return;
        };

        let (kind, result) = match &intent {
            ToggleIntent::Share { kind, value } => {
                tracing::info!("Sharing {:?} identifier", kind);
                (*kind, self.service.bind_identifier(*kind, value).await)
            }
            ToggleIntent::Revoke { kind, value } => {
                tracing::info!("Revoking {:?} identifier", kind);
                (*kind, self.service.unbind_identifier(*kind, value).await)
            }
        };

        // Only the reload is authoritative, the returned state is informational
        match result {
            Ok(shared) => tracing::debug!("Identity server answered {:?}", shared),
            Err(e) => tracing::warn!("{:?} toggle failed: {}", kind, e),
        }

        self.load_list(kind).await;
    }

    fn generation(&self, kind: PidKind) -> &AtomicU64 {
        match kind {
            PidKind::Email => &self.email_generation,
            PidKind::Phone => &self.phone_generation,
        }
    }

    async fn load_list(&self, kind: PidKind) {
        let generation = self.generation(kind).fetch_add(1, Ordering::SeqCst) + 1;
        self.apply(DiscoveryEvent::loading(kind));

        let result = self
            .service
            .list_bound_identifiers(kind)
            .await
            .map(|entries| {
                entries
                    .into_iter()
                    .map(|(value, shared)| PidState::new(kind, value, shared))
                    .collect::<Vec<_>>()
            });

        if self.generation(kind).load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding superseded {:?} list load", kind);
            return;
        }

        match &result {
            Ok(pids) => tracing::debug!("Loaded {} {:?} identifiers", pids.len(), kind),
            Err(e) => tracing::warn!("Failed to load {:?} identifiers: {}", kind, e),
        }
        self.apply(DiscoveryEvent::loaded(kind, result));
    }
}

// ============================================================================
// TESTS
// ============================================================================
