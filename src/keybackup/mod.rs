//! # Key Backup Module
//!
//! Recovery key step of the key backup setup wizard. Key generation and
//! backup version creation belong to the crypto subsystem
//! ([`KeyBackupService`]); this module sequences them and decides what the
//! screen shows.

mod format;
mod service;
mod state;
mod step;

pub use format::format_recovery_key;
pub use service::{KeyBackupService, ShareRequest, ShareTarget};
pub use state::{BackupCreationInfo, KeyBackupPhase, KeyBackupSetupState, KeysVersion, RecoveryKey};
pub use step::{
    ErrorDialog, FinishOutcome, FinishResult, KeyBackupStep, KeyBackupStrings, StepExit, StepView,
};
