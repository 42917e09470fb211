//! Key backup setup state.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::format::format_recovery_key;
use crate::error::Error;

/// User-held secret that restores encrypted message history.
///
/// Zeroed on drop. `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RecoveryKey(String);

impl RecoveryKey {
    /// Wrap a key produced by the crypto subsystem
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, as generated
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Display layout, see [`format_recovery_key`]
    pub fn formatted(&self) -> String {
        format_recovery_key(&self.0)
    }

    /// True when the key carries no characters besides spaces
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for RecoveryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecoveryKey([REDACTED])")
    }
}

/// Parameters the crypto subsystem needs to create a backup version.
///
/// Produced once, together with the recovery key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupCreationInfo {
    /// Backup algorithm identifier
    pub algorithm: String,
    /// Algorithm-specific signed auth data, opaque here
    pub auth_data: serde_json::Value,
}

/// Handle of a created server-side backup version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysVersion {
    /// Version identifier returned to the wizard's caller
    pub version: String,
}

/// Where the recovery key step is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyBackupPhase {
    /// Waiting for the recovery key
    #[default]
    GeneratingKey,
    /// Key shown, waiting for copy and finish
    KeyReady,
    /// Backup version creation in flight
    CreatingBackup,
    /// Backup version created, the wizard closes
    Done,
    /// Generation or creation failed, a dialog is up
    Error,
}

/// State shared by the key backup wizard steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyBackupSetupState {
    /// Generated lazily on first entry to the step
    pub recovery_key: Option<RecoveryKey>,
    /// Produced with the recovery key
    pub megolm_backup_creation_info: Option<BackupCreationInfo>,
    /// Set once the key has been handed to a share target
    pub copy_has_been_made: bool,
    /// Backup version creation in flight
    pub is_creating_backup_version: bool,
    /// Recovery key generation failure
    pub prepare_recovery_error: Option<Error>,
    /// Backup version creation failure
    pub creating_backup_error: Option<Error>,
    /// Terminal: set when the backup version exists
    pub keys_version_result: Option<KeysVersion>,
    /// Current phase
    pub phase: KeyBackupPhase,
}

impl KeyBackupSetupState {
    /// True once a non-blank key is available
    pub fn has_recovery_key(&self) -> bool {
        self.recovery_key.as_ref().is_some_and(|key| !key.is_blank())
    }

    /// First pending error, generation before creation
    pub fn pending_error(&self) -> Option<&Error> {
        self.prepare_recovery_error
            .as_ref()
            .or(self.creating_backup_error.as_ref())
    }
}
