//! # Error Handling
//!
//! Error types shared by the discovery settings flow and the key-backup
//! setup step.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Discovery Load Errors                                             │
//! │  │   ├── LoadFailed            - Identifier list fetch failed          │
//! │  │   └── NoIdentityServer      - Operation needs a bound server        │
//! │  │                                                                      │
//! │  ├── Identity Server Action Errors                                     │
//! │  │   ├── ActionFailed          - Share/revoke call failed              │
//! │  │   ├── InvalidIdentityServer - Server URL rejected                   │
//! │  │   └── Timeout               - Identity server did not answer        │
//! │  │                                                                      │
//! │  ├── Key Backup Errors                                                 │
//! │  │   ├── GenerationFailed      - Recovery key generation failed        │
//! │  │   └── BackupCreationFailed  - Backup version creation failed        │
//! │  │                                                                      │
//! │  └── Internal Errors                                                   │
//! │      ├── Internal              - Should not happen                     │
//! │      └── SerializationError    - Snapshot encoding failed              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures never cross the render boundary as panics. They are stored as
//! values inside state (`AsyncResult::Failure`, `creating_backup_error`) and
//! the renderers project them into rows or dialogs. That is why [`Error`] is
//! `Clone + PartialEq`.

use thiserror::Error;

/// Result type alias for settings core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the settings core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Discovery Load Errors (100-199)
    // ========================================================================

    /// Fetching the bound identifiers failed
    #[error("Failed to load identifiers: {0}")]
    LoadFailed(String),

    /// No identity server is configured
    #[error("No identity server configured.")]
    NoIdentityServer,

    // ========================================================================
    // Identity Server Action Errors (200-299)
    // ========================================================================

    /// A share or revoke call failed
    #[error("Identity server action failed: {0}")]
    ActionFailed(String),

    /// The identity server URL was rejected
    #[error("Invalid identity server: {0}")]
    InvalidIdentityServer(String),

    /// The identity server did not answer in time
    #[error("Identity server timed out: {0}")]
    Timeout(String),

    // ========================================================================
    // Key Backup Errors (300-399)
    // ========================================================================

    /// Recovery key generation failed
    #[error("Failed to generate recovery key: {0}")]
    GenerationFailed(String),

    /// Creating the backup version on the server failed
    #[error("Failed to create key backup version: {0}")]
    BackupCreationFailed(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl Error {
    /// Get the numeric error code reported to the host
    ///
    /// Error codes are organized by category:
    /// - 100-199: Discovery loads
    /// - 200-299: Identity server actions
    /// - 300-399: Key backup
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            // Discovery (100-199)
            Error::LoadFailed(_) => 100,
            Error::NoIdentityServer => 101,

            // Identity server (200-299)
            Error::ActionFailed(_) => 200,
            Error::InvalidIdentityServer(_) => 201,
            Error::Timeout(_) => 202,

            // Key backup (300-399)
            Error::GenerationFailed(_) => 300,
            Error::BackupCreationFailed(_) => 301,

            // Internal (900-999)
            Error::Internal(_) => 900,
            Error::SerializationError(_) => 901,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors can be resolved by reloading or retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::LoadFailed(_) | Error::ActionFailed(_) | Error::Timeout(_)
        )
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

// ============================================================================
// HOST ERROR REPRESENTATION
// ============================================================================

/// Host-friendly error representation
///
/// What a dialog or toast on the host side needs to show an error.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ErrorReport {
    /// Numeric error code
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the error is recoverable
    pub recoverable: bool,
}

impl From<&Error> for ErrorReport {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
        }
    }
}

impl From<Error> for ErrorReport {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

// ============================================================================
// TESTS
// ============================================================================
