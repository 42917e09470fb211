//! # Discovery Controller
//!
//! Projects a [`DiscoverySettingsState`] snapshot into an ordered list of row
//! descriptors and routes row interactions to an [`InteractionListener`].
//!
//! ## Row Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  idsTitle        Identity server                                        │
//! │  idServer        https://is.example.org            (tap → select)       │
//! │  idServerFooter  You are currently using ...                            │
//! │  change          [ Change ]                                             │
//! │  removeInfo      Disconnecting from your identity server ...  (bound)   │
//! │  remove          [ Disconnect ]                               (bound)   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  emails          Discoverable email addresses                 (bound)   │
//! │  a@b.com         a@b.com                               [switch]         │
//! │  ...                                                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  pns             Discoverable phone numbers                   (bound)   │
//! │  447700900123    +44 7700 900123                       [pending]        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Row ids are stable across renders. Identifier rows use the raw value as
//! id, so a host diffing by id keeps the right row even when list order or
//! loading state changes.
//!
//! Rendering is total: every state, including `None`, yields a row list.

use std::sync::Arc;

use serde::Serialize;

use super::async_result::AsyncResult;
use super::format::{display_phone, InternationalFormatter, PhoneNumberFormatter};
use super::listener::InteractionListener;
use super::pid::{PidKind, PidState, SharedState};
use super::state::DiscoverySettingsState;
use crate::error::ErrorReport;

/// Display strings used by the discovery rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryStrings {
    /// Identity server section title
    pub identity_server_title: String,
    /// Shown in place of the URL when unbound
    pub none: String,
    /// Footer under the server row; `{}` is replaced by the server
    pub identity_server_info: String,
    /// "Change" button
    pub change: String,
    /// Explanation above the disconnect button
    pub disconnect_info: String,
    /// "Disconnect" button
    pub disconnect: String,
    /// Email section title
    pub emails_title: String,
    /// Placeholder when the account has no email
    pub no_emails: String,
    /// Failure row of the email section
    pub emails_failed: String,
    /// Phone section title
    pub phone_numbers_title: String,
    /// Placeholder when the account has no phone number
    pub no_phone_numbers: String,
    /// Failure row of the phone section
    pub phone_numbers_failed: String,
    /// Label of a pending identifier
    pub pending: String,
    /// Hint under a pending identifier
    pub confirm_pending: String,
}

impl Default for DiscoveryStrings {
    fn default() -> Self {
        Self {
            identity_server_title: "Identity server".into(),
            none: "None".into(),
            identity_server_info: "You are currently using {} to discover and be discoverable by existing contacts you know.".into(),
            change: "Change".into(),
            disconnect_info: "Disconnecting from your identity server will mean you won't be discoverable by other users and you won't be able to invite others by email or phone.".into(),
            disconnect: "Disconnect".into(),
            emails_title: "Discoverable email addresses".into(),
            no_emails: "Discovery options will appear once you have added an email.".into(),
            emails_failed: "Could not load your email addresses.".into(),
            phone_numbers_title: "Discoverable phone numbers".into(),
            no_phone_numbers: "Discovery options will appear once you have added a phone number.".into(),
            phone_numbers_failed: "Could not load your phone numbers.".into(),
            pending: "Pending".into(),
            confirm_pending: "We sent you a confirmation. Check your inbox or messages, then come back here.".into(),
        }
    }
}

/// Visual weight of a button row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    /// Regular action
    Positive,
    /// Irreversible action
    Destructive,
}

/// Click handler attached to a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowAction {
    /// Open the identity server picker
    SelectIdentityServer,
    /// Open the change-server flow
    ChangeIdentityServer,
    /// Bind a server, or unbind with `None`
    SetIdentityServer {
        /// New server
        server: Option<String>,
    },
}

/// Trailing control of an identifier row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdentifierControl {
    /// Disabled, undetermined toggle
    Indeterminate,
    /// Interactive switch
    Switch {
        /// Current position
        checked: bool,
    },
    /// Static label with a confirmation hint, no interaction
    Pending {
        /// Button label
        label: String,
        /// Hint shown under the row
        info_message: String,
    },
}

/// Row content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowKind {
    /// Section header
    SectionTitle {
        /// Title text
        title: String,
    },
    /// Clickable description row
    Item {
        /// Description text
        description: String,
        /// Click handler
        action: RowAction,
    },
    /// Informational helper text
    Info {
        /// Helper text
        helper_text: String,
    },
    /// Button row
    Button {
        /// Button label
        title: String,
        /// Visual weight
        style: ButtonStyle,
        /// Click handler
        action: RowAction,
    },
    /// Loading spinner, with optional text
    Loading {
        /// Text next to the spinner, hidden when `None`
        text: Option<String>,
    },
    /// Section failed to load
    Failure {
        /// Text shown to the user
        message: String,
        /// Underlying error
        error: ErrorReport,
    },
    /// One email address or phone number
    Identifier {
        /// Identifier kind
        kind: PidKind,
        /// Raw value
        value: String,
        /// Display title (formatted for phones)
        title: String,
        /// Trailing control
        control: IdentifierControl,
    },
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsRow {
    /// Stable id used for diffing
    pub id: String,
    /// Row content
    #[serde(flatten)]
    pub kind: RowKind,
}

impl SettingsRow {
    fn new(id: impl Into<String>, kind: RowKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Interaction produced by clicking this row, if it is clickable
    pub fn click(&self) -> Option<RowInteraction> {
        match &self.kind {
            RowKind::Item { action, .. } | RowKind::Button { action, .. } => {
                Some(RowInteraction::Clicked(action.clone()))
            }
            _ => None,
        }
    }

    /// Interaction produced by moving this row's switch to `checked`.
    ///
    /// Only switch rows react. Pending and indeterminate rows yield `None`.
    pub fn switch_changed(&self, checked: bool) -> Option<RowInteraction> {
        match &self.kind {
            RowKind::Identifier {
                kind,
                value,
                control: IdentifierControl::Switch { .. },
                ..
            } => Some(RowInteraction::SwitchChanged {
                kind: *kind,
                value: value.clone(),
                checked,
            }),
            _ => None,
        }
    }
}

/// User interaction on a rendered row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowInteraction {
    /// Row or button clicked
    Clicked(RowAction),
    /// Identifier switch moved
    SwitchChanged {
        /// Identifier kind
        kind: PidKind,
        /// Raw value
        value: String,
        /// New switch position
        checked: bool,
    },
}

/// Renders discovery rows and wires interactions back to intents
pub struct DiscoveryController {
    strings: DiscoveryStrings,
    formatter: Box<dyn PhoneNumberFormatter>,
    listener: Option<Arc<dyn InteractionListener>>,
}

impl DiscoveryController {
    /// Create a controller with default strings and formatter
    pub fn new(listener: Option<Arc<dyn InteractionListener>>) -> Self {
        Self {
            strings: DiscoveryStrings::default(),
            formatter: Box::new(InternationalFormatter),
            listener,
        }
    }

    /// Replace the display strings
    pub fn with_strings(mut self, strings: DiscoveryStrings) -> Self {
        self.strings = strings;
        self
    }

    /// Replace the phone number formatter
    pub fn with_formatter(mut self, formatter: Box<dyn PhoneNumberFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Build the row list for `data`
    pub fn render(&self, data: Option<&DiscoverySettingsState>) -> Vec<SettingsRow> {
        let mut rows = Vec::new();
        let Some(data) = data else {
            return rows;
        };

        self.build_identity_server_section(data, &mut rows);

        if data.has_identity_server() {
            self.build_pid_section(PidKind::Email, &data.email_list, &mut rows);
            self.build_pid_section(PidKind::Phone, &data.phone_numbers_list, &mut rows);
        }

        rows
    }

    /// Route a row interaction to the listener
    pub fn dispatch(&self, interaction: RowInteraction) {
        let Some(listener) = &self.listener else {
            tracing::debug!("No interaction listener, ignoring {:?}", interaction);
            return;
        };

        match interaction {
            RowInteraction::Clicked(RowAction::SelectIdentityServer) => {
                listener.on_select_identity_server()
            }
            RowInteraction::Clicked(RowAction::ChangeIdentityServer) => {
                listener.on_change_identity_server()
            }
            RowInteraction::Clicked(RowAction::SetIdentityServer { server }) => {
                listener.on_set_identity_server(server)
            }
            RowInteraction::SwitchChanged {
                kind,
                value,
                checked,
            } => match (kind, checked) {
                (PidKind::Email, true) => listener.on_tap_share_email(&value),
                (PidKind::Email, false) => listener.on_tap_revoke_email(&value),
                (PidKind::Phone, true) => listener.on_tap_share_pn(&value),
                (PidKind::Phone, false) => listener.on_tap_revoke_pn(&value),
            },
        }
    }

    fn build_identity_server_section(
        &self,
        data: &DiscoverySettingsState,
        rows: &mut Vec<SettingsRow>,
    ) {
        let strings = &self.strings;
        let identity_server = data.identity_server.as_deref().unwrap_or(strings.none.as_str());

        rows.push(SettingsRow::new(
            "idsTitle",
            RowKind::SectionTitle {
                title: strings.identity_server_title.clone(),
            },
        ));
        rows.push(SettingsRow::new(
            "idServer",
            RowKind::Item {
                description: identity_server.to_string(),
                action: RowAction::SelectIdentityServer,
            },
        ));
        rows.push(SettingsRow::new(
            "idServerFooter",
            RowKind::Info {
                helper_text: strings.identity_server_info.replace("{}", identity_server),
            },
        ));
        rows.push(SettingsRow::new(
            "change",
            RowKind::Button {
                title: strings.change.clone(),
                style: ButtonStyle::Positive,
                action: RowAction::ChangeIdentityServer,
            },
        ));

        if data.has_identity_server() {
            rows.push(SettingsRow::new(
                "removeInfo",
                RowKind::Info {
                    helper_text: strings.disconnect_info.clone(),
                },
            ));
            rows.push(SettingsRow::new(
                "remove",
                RowKind::Button {
                    title: strings.disconnect.clone(),
                    style: ButtonStyle::Destructive,
                    action: RowAction::SetIdentityServer { server: None },
                },
            ));
        }
    }

    fn build_pid_section(
        &self,
        kind: PidKind,
        list: &AsyncResult<Vec<PidState>>,
        rows: &mut Vec<SettingsRow>,
    ) {
        let strings = &self.strings;
        let (section_id, title, loading_id, empty_id, empty_text, error_id, error_text) = match kind
        {
            PidKind::Email => (
                "emails",
                &strings.emails_title,
                "emailLoading",
                "no_emails",
                &strings.no_emails,
                "emails_error",
                &strings.emails_failed,
            ),
            PidKind::Phone => (
                "pns",
                &strings.phone_numbers_title,
                "phoneLoading",
                "no_pns",
                &strings.no_phone_numbers,
                "pns_error",
                &strings.phone_numbers_failed,
            ),
        };

        rows.push(SettingsRow::new(
            section_id,
            RowKind::SectionTitle {
                title: title.clone(),
            },
        ));

        match list {
            AsyncResult::Uninitialized => {}
            AsyncResult::Loading => {
                rows.push(SettingsRow::new(loading_id, RowKind::Loading { text: None }));
            }
            AsyncResult::Failure(err) => {
                rows.push(SettingsRow::new(
                    error_id,
                    RowKind::Failure {
                        message: error_text.clone(),
                        error: err.into(),
                    },
                ));
            }
            AsyncResult::Success(pids) if pids.is_empty() => {
                rows.push(SettingsRow::new(
                    empty_id,
                    RowKind::Info {
                        helper_text: empty_text.clone(),
                    },
                ));
            }
            AsyncResult::Success(pids) => {
                rows.extend(pids.iter().map(|pid| self.identifier_row(pid)));
            }
        }
    }

    fn identifier_row(&self, pid: &PidState) -> SettingsRow {
        let title = match pid.kind() {
            PidKind::Email => pid.value().to_string(),
            PidKind::Phone => display_phone(self.formatter.as_ref(), pid.value()),
        };

        let control = match pid.shared_state {
            SharedState::Unknown => IdentifierControl::Indeterminate,
            SharedState::Shared => IdentifierControl::Switch { checked: true },
            SharedState::NotShared => IdentifierControl::Switch { checked: false },
            SharedState::Pending => IdentifierControl::Pending {
                label: self.strings.pending.clone(),
                info_message: self.strings.confirm_pending.clone(),
            },
        };

        SettingsRow::new(
            pid.value(),
            RowKind::Identifier {
                kind: pid.kind(),
                value: pid.value().to_string(),
                title,
                control,
            },
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
