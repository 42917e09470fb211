//! Collaborators of the recovery key step.

use async_trait::async_trait;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::state::{BackupCreationInfo, KeysVersion, RecoveryKey};
use crate::error::Result;

/// Crypto subsystem operations used by the key backup wizard
#[async_trait]
pub trait KeyBackupService: Send + Sync {
    /// Generate a recovery key and the matching backup creation parameters
    async fn generate_recovery_key(&self) -> Result<(RecoveryKey, BackupCreationInfo)>;

    /// Create the server-side backup version
    async fn create_backup_version(&self, info: &BackupCreationInfo) -> Result<KeysVersion>;
}

/// Text handed to the platform share sheet.
///
/// Holds the recovery key, so it is zeroed on drop and redacted in `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ShareRequest {
    /// Subject line for targets that use one
    pub subject: String,
    /// Shared text
    pub text: String,
}

impl std::fmt::Debug for ShareRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareRequest")
            .field("subject", &self.subject)
            .field("text", &"[REDACTED]")
            .finish()
    }
}

/// Platform share sheet or clipboard
pub trait ShareTarget {
    /// Offer `request` to the user
    fn share(&self, request: &ShareRequest);
}
