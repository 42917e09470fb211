//! # Discovery Module
//!
//! Settings screen that controls whether other users can find this account
//! by email address or phone number through an identity server.
//!
//! ## Data Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         DISCOVERY SETTINGS                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   IdentityService ──► DiscoveryEvent ──► reduce() ──► SettingsState    │
//! │         ▲                                                │              │
//! │         │ bind / unbind / list                           ▼              │
//! │   DiscoveryCoordinator ◄── DiscoveryIntent ◄── DiscoveryController     │
//! │                              (InteractionListener)       │              │
//! │                                                          ▼              │
//! │                                                   Vec<SettingsRow>      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identifier States
//!
//! ```text
//!   NotShared ──share──► (Pending) ──confirmed──► Shared
//!       ▲                                            │
//!       └──────────────────revoke────────────────────┘
//! ```
//!
//! `Unknown` renders as an indeterminate row and accepts no toggle. A
//! `Pending` identifier waits for the user to follow a confirmation link
//! (email) or enter a code (phone); the list reload that follows shows it.

mod async_result;
mod controller;
mod coordinator;
mod format;
mod listener;
mod pid;
mod reducer;
mod service;
mod state;

pub use async_result::AsyncResult;
pub use controller::{
    ButtonStyle, DiscoveryController, DiscoveryStrings, IdentifierControl, RowAction,
    RowInteraction, RowKind, SettingsRow,
};
pub use coordinator::{DiscoveryCoordinator, Navigation};
pub use format::{InternationalFormatter, PhoneNumberFormatter};
pub use listener::{ChannelListener, DiscoveryIntent, InteractionListener};
pub use pid::{PidKind, PidState, SharedState};
pub use reducer::{reduce, DiscoveryEvent, Reduction, ToggleIntent};
pub use service::IdentityService;
pub use state::DiscoverySettingsState;
