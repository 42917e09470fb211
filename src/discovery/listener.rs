//! Outward intent contract of the discovery screen.
//!
//! Every call is fire-and-forget. Results come back later as list loads.

use tokio::sync::mpsc;

/// Receives user intents raised by discovery rows
pub trait InteractionListener: Send + Sync {
    /// The identity server row was tapped
    fn on_select_identity_server(&self);
    /// The "change" button was tapped
    fn on_change_identity_server(&self);
    /// Bind a new server, or unbind with `None`
    fn on_set_identity_server(&self, server: Option<String>);
    /// Share an email address
    fn on_tap_share_email(&self, email: &str);
    /// Stop sharing an email address
    fn on_tap_revoke_email(&self, email: &str);
    /// Share a phone number
    fn on_tap_share_pn(&self, pn: &str);
    /// Stop sharing a phone number
    fn on_tap_revoke_pn(&self, pn: &str);
}

/// Typed form of the listener calls, for message passing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryIntent {
    /// See [`InteractionListener::on_select_identity_server`]
    SelectIdentityServer,
    /// See [`InteractionListener::on_change_identity_server`]
    ChangeIdentityServer,
    /// See [`InteractionListener::on_set_identity_server`]
    SetIdentityServer(Option<String>),
    /// See [`InteractionListener::on_tap_share_email`]
    ShareEmail(String),
    /// See [`InteractionListener::on_tap_revoke_email`]
    RevokeEmail(String),
    /// See [`InteractionListener::on_tap_share_pn`]
    SharePhoneNumber(String),
    /// See [`InteractionListener::on_tap_revoke_pn`]
    RevokePhoneNumber(String),
}

/// Listener that forwards every call into a channel.
///
/// The receiving end is usually [`DiscoveryCoordinator::run`](super::DiscoveryCoordinator::run).
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<DiscoveryIntent>,
}

impl ChannelListener {
    /// Create a listener and the receiver for its intents
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DiscoveryIntent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, intent: DiscoveryIntent) {
        if self.tx.send(intent).is_err() {
            tracing::warn!("Discovery intent dropped: coordinator has stopped");
        }
    }
}

impl InteractionListener for ChannelListener {
    fn on_select_identity_server(&self) {
        self.send(DiscoveryIntent::SelectIdentityServer);
    }

    fn on_change_identity_server(&self) {
        self.send(DiscoveryIntent::ChangeIdentityServer);
    }

    fn on_set_identity_server(&self, server: Option<String>) {
        self.send(DiscoveryIntent::SetIdentityServer(server));
    }

    fn on_tap_share_email(&self, email: &str) {
        self.send(DiscoveryIntent::ShareEmail(email.to_string()));
    }

    fn on_tap_revoke_email(&self, email: &str) {
        self.send(DiscoveryIntent::RevokeEmail(email.to_string()));
    }

    fn on_tap_share_pn(&self, pn: &str) {
        self.send(DiscoveryIntent::SharePhoneNumber(pn.to_string()));
    }

    fn on_tap_revoke_pn(&self, pn: &str) {
        self.send(DiscoveryIntent::RevokePhoneNumber(pn.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_listener_forwards_in_order() {
        let (listener, mut rx) = ChannelListener::new();

        listener.on_tap_share_email("a@b.com");
        listener.on_tap_revoke_pn("447700900123");
        listener.on_set_identity_server(None);

        assert_eq!(rx.try_recv().unwrap(), DiscoveryIntent::ShareEmail("a@b.com".into()));
        assert_eq!(
            rx.try_recv().unwrap(),
            DiscoveryIntent::RevokePhoneNumber("447700900123".into())
        );
        assert_eq!(rx.try_recv().unwrap(), DiscoveryIntent::SetIdentityServer(None));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_does_not_panic() {
        let (listener, rx) = ChannelListener::new();
        drop(rx);

        listener.on_select_identity_server();
    }
}
