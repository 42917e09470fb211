//! # Messenger Settings Core
//!
//! Headless state and orchestration for two settings flows of a secure
//! messaging client. The host owns rendering, navigation and the client SDK;
//! this crate owns state, transitions and what each screen shows.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      MESSENGER SETTINGS CORE                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌───────────────────────────────┐   ┌───────────────────────────────┐  │
//! │  │          Discovery            │   │          Key Backup           │  │
//! │  │                               │   │                               │  │
//! │  │ - Identity server binding     │   │ - Recovery key generation     │  │
//! │  │ - Email / phone sharing       │   │ - Copy / share                │  │
//! │  │ - Row rendering               │   │ - Backup version creation     │  │
//! │  └───────────────┬───────────────┘   └───────────────┬───────────────┘  │
//! │                  │                                   │                  │
//! │                  ▼                                   ▼                  │
//! │         IdentityService                      KeyBackupService           │
//! │         (client SDK, async)                  (crypto subsystem, async)  │
//! │                                                                         │
//! │  ┌──────────┐  ┌──────────┐  ┌──────────┐                               │
//! │  │  Error   │  │  Config  │  │ Logging  │                               │
//! │  └──────────┘  └──────────┘  └──────────┘                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`config`] - Runtime configuration
//! - [`logging`] - Tracing subscriber setup
//! - [`discovery`] - Discovery settings (state, reducer, controller, coordinator)
//! - [`keybackup`] - Recovery key step of the key backup wizard

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod config;
pub mod discovery;
pub mod error;
pub mod keybackup;
pub mod logging;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use config::CoreConfig;
pub use discovery::{
    DiscoveryController, DiscoveryCoordinator, DiscoverySettingsState, IdentityService,
    InteractionListener, PidState,
};
pub use error::{Error, ErrorReport, Result};
pub use keybackup::{KeyBackupService, KeyBackupStep, RecoveryKey};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of the settings core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }
}
