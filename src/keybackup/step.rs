//! # Recovery Key Step
//!
//! Third step of the key backup wizard: show the recovery key, make the user
//! keep a copy, then create the backup version.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         RECOVERY KEY STEP                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   GeneratingKey ──key──► KeyReady ──finish (copied)──► CreatingBackup   │
//! │        │                   │  ▲                            │     │      │
//! │        │ error             │  └── finish (no copy):        │     │ ok   │
//! │        ▼                   │      reminder                 │     ▼      │
//! │      Error ◄───────────────┼───────────────────── error ───┘    Done    │
//! │        │                   │                                            │
//! │        └── acknowledge ──► NavigateBack        Done ──► Completed(v)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each transition is a synchronous method so hosts can drive the step from
//! their own callbacks. [`KeyBackupStep::enter`] and
//! [`KeyBackupStep::run_finish`] compose them with the async collaborator.

use super::service::{KeyBackupService, ShareRequest, ShareTarget};
use super::state::{BackupCreationInfo, KeyBackupPhase, KeyBackupSetupState, KeysVersion, RecoveryKey};
use crate::error::Result;

/// Display strings of the recovery key step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBackupStrings {
    /// Status under the spinner while the key is generated
    pub generating: String,
    /// Subject of the share request
    pub recovery_key_subject: String,
    /// Shown when finishing before a copy was made
    pub make_copy_reminder: String,
    /// Dialog title for generation failures
    pub unknown_error: String,
    /// Dialog title for backup creation failures
    pub unexpected_error: String,
    /// Dialog acknowledge button
    pub ok: String,
}

impl Default for KeyBackupStrings {
    fn default() -> Self {
        Self {
            generating: "Generating recovery key using passphrase, this process can take several seconds.".into(),
            recovery_key_subject: "Recovery Key".into(),
            make_copy_reminder: "Please make a copy".into(),
            unknown_error: "Unknown error".into(),
            unexpected_error: "Unexpected error".into(),
            ok: "OK".into(),
        }
    }
}

/// Result of pressing the finish button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    /// No creation info yet, nothing happens
    NotReady,
    /// No copy made yet, show this message
    Reminder(String),
    /// Create the backup version with this info
    CreateBackup(BackupCreationInfo),
}

/// How the step leaves the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepExit {
    /// Backup created, return the version to the caller
    Completed(KeysVersion),
    /// Error acknowledged, go back to the previous screen
    NavigateBack,
}

/// Result of [`KeyBackupStep::run_finish`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishResult {
    /// Nothing happened
    NotReady,
    /// Show a reminder to make a copy
    Reminder(String),
    /// Creation failed, the error dialog is up
    Failed,
    /// The step is over
    Exit(StepExit),
}

/// Blocking error dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    /// Dialog title
    pub title: String,
    /// Error description
    pub message: String,
    /// Acknowledge button label
    pub button: String,
}

/// What the step shows for the current state
#[derive(Clone, PartialEq, Eq)]
pub struct StepView {
    /// Spinner while the key is generated
    pub spinner_visible: bool,
    /// Text under the spinner
    pub status_text: Option<String>,
    /// Formatted recovery key
    pub key_text: Option<String>,
    /// Copy / share button
    pub copy_visible: bool,
    /// Finish button
    pub finish_visible: bool,
    /// Full-screen waiting overlay during backup creation
    pub waiting_view: bool,
    /// Error dialog, if any
    pub dialog: Option<ErrorDialog>,
}

impl std::fmt::Debug for StepView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepView")
            .field("spinner_visible", &self.spinner_visible)
            .field("status_text", &self.status_text)
            .field("key_text", &self.key_text.as_ref().map(|_| "[REDACTED]"))
            .field("copy_visible", &self.copy_visible)
            .field("finish_visible", &self.finish_visible)
            .field("waiting_view", &self.waiting_view)
            .field("dialog", &self.dialog)
            .finish()
    }
}

/// Recovery key step of the key backup wizard
#[derive(Debug, Default)]
pub struct KeyBackupStep {
    state: KeyBackupSetupState,
    strings: KeyBackupStrings,
}

impl KeyBackupStep {
    /// Start with the state shared by the wizard
    pub fn new(state: KeyBackupSetupState) -> Self {
        Self {
            state,
            strings: KeyBackupStrings::default(),
        }
    }

    /// Replace the display strings
    pub fn with_strings(mut self, strings: KeyBackupStrings) -> Self {
        self.strings = strings;
        self
    }

    /// Current state
    pub fn state(&self) -> &KeyBackupSetupState {
        &self.state
    }

    /// Give the state back to the wizard
    pub fn into_state(self) -> KeyBackupSetupState {
        self.state
    }

    // ========================================================================
    // GENERATION
    // ========================================================================

    /// Enter the step, generating the key on first entry.
    pub async fn enter<S: KeyBackupService + ?Sized>(&mut self, service: &S) {
        if self.begin_generation() {
            let result = service.generate_recovery_key().await;
            self.complete_generation(result);
        }
    }

    /// Returns true when the caller must generate a key.
    pub fn begin_generation(&mut self) -> bool {
        if self.state.has_recovery_key() {
            return false;
        }

        tracing::debug!("Requesting recovery key generation");
        self.state.phase = KeyBackupPhase::GeneratingKey;
        self.state.prepare_recovery_error = None;
        true
    }

    /// Store the generation result.
    pub fn complete_generation(&mut self, result: Result<(RecoveryKey, BackupCreationInfo)>) {
        if self.state.has_recovery_key() {
            tracing::debug!("Recovery key already present, ignoring generation result");
            return;
        }

        match result {
            Ok((key, info)) => {
                tracing::info!("Recovery key generated ({})", info.algorithm);
                self.state.recovery_key = Some(key);
                self.state.megolm_backup_creation_info = Some(info);
                self.state.phase = KeyBackupPhase::KeyReady;
            }
            Err(e) => {
                tracing::warn!("Recovery key generation failed: {}", e);
                self.state.prepare_recovery_error = Some(e);
                self.state.phase = KeyBackupPhase::Error;
            }
        }
    }

    // ========================================================================
    // COPY
    // ========================================================================

    /// Hand the formatted key to `target`. Returns false when there is no key.
    pub fn share_key(&mut self, target: &dyn ShareTarget) -> bool {
        let Some(key) = self.state.recovery_key.as_ref().filter(|key| !key.is_blank()) else {
            return false;
        };

        let request = ShareRequest {
            subject: self.strings.recovery_key_subject.clone(),
            text: key.formatted(),
        };
        target.share(&request);

        self.state.copy_has_been_made = true;
        tracing::debug!("Recovery key handed to share target");
        true
    }

    // ========================================================================
    // BACKUP CREATION
    // ========================================================================

    /// Press the finish button.
    pub fn finish(&mut self) -> FinishOutcome {
        if self.state.is_creating_backup_version {
            tracing::debug!("Backup creation already in flight");
            return FinishOutcome::NotReady;
        }
        if self.state.keys_version_result.is_some() {
            tracing::debug!("Backup version already created");
            return FinishOutcome::NotReady;
        }
        if self.state.pending_error().is_some() {
            tracing::debug!("Error dialog open, ignoring finish");
            return FinishOutcome::NotReady;
        }

        let Some(info) = self.state.megolm_backup_creation_info.clone() else {
            return FinishOutcome::NotReady;
        };

        if !self.state.copy_has_been_made {
            return FinishOutcome::Reminder(self.strings.make_copy_reminder.clone());
        }

        tracing::info!("Creating key backup version");
        self.state.is_creating_backup_version = true;
        self.state.creating_backup_error = None;
        self.state.phase = KeyBackupPhase::CreatingBackup;
        FinishOutcome::CreateBackup(info)
    }

    /// Press finish and, when allowed, create the backup version.
    pub async fn run_finish<S: KeyBackupService + ?Sized>(&mut self, service: &S) -> FinishResult {
        match self.finish() {
            FinishOutcome::NotReady => FinishResult::NotReady,
            FinishOutcome::Reminder(message) => FinishResult::Reminder(message),
            FinishOutcome::CreateBackup(info) => {
                let result = service.create_backup_version(&info).await;
                match self.complete_backup(result) {
                    Some(exit) => FinishResult::Exit(exit),
                    None => FinishResult::Failed,
                }
            }
        }
    }

    /// Store the backup creation result. Success ends the step.
    pub fn complete_backup(&mut self, result: Result<KeysVersion>) -> Option<StepExit> {
        if !self.state.is_creating_backup_version {
            tracing::debug!("No backup creation in flight, ignoring result");
            return None;
        }
        self.state.is_creating_backup_version = false;

        match result {
            Ok(version) => {
                tracing::info!("Key backup version {} created", version.version);
                self.state.keys_version_result = Some(version.clone());
                self.state.phase = KeyBackupPhase::Done;
                Some(StepExit::Completed(version))
            }
            Err(e) => {
                tracing::warn!("Key backup creation failed: {}", e);
                self.state.creating_backup_error = Some(e);
                self.state.phase = KeyBackupPhase::Error;
                None
            }
        }
    }

    /// Dismiss the error dialog. The step is abandoned, there is no retry.
    pub fn acknowledge_error(&mut self) -> Option<StepExit> {
        self.state.pending_error()?;

        self.state.prepare_recovery_error = None;
        self.state.creating_backup_error = None;
        self.state.phase = if self.state.has_recovery_key() {
            KeyBackupPhase::KeyReady
        } else {
            KeyBackupPhase::GeneratingKey
        };
        Some(StepExit::NavigateBack)
    }

    // ========================================================================
    // VIEW
    // ========================================================================

    /// Project the state for display
    pub fn view(&self) -> StepView {
        let key_text = self
            .state
            .recovery_key
            .as_ref()
            .filter(|key| !key.is_blank())
            .map(RecoveryKey::formatted);
        let has_key = key_text.is_some();

        let dialog = if let Some(e) = &self.state.prepare_recovery_error {
            Some(self.dialog(&self.strings.unknown_error, e.to_string()))
        } else {
            self.state
                .creating_backup_error
                .as_ref()
                .map(|e| self.dialog(&self.strings.unexpected_error, e.to_string()))
        };

        StepView {
            spinner_visible: !has_key,
            status_text: (!has_key).then(|| self.strings.generating.clone()),
            key_text,
            copy_visible: has_key,
            finish_visible: has_key,
            waiting_view: self.state.is_creating_backup_version,
            dialog,
        }
    }

    fn dialog(&self, title: &str, message: String) -> ErrorDialog {
        ErrorDialog {
            title: title.to_string(),
            message,
            button: self.strings.ok.clone(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    const KEY: &str = "abcd1234abcd1234abcd1234abcd1234";
    const FORMATTED: &str = "abcd 1234 abcd 1234\nabcd 1234 abcd 1234";

    #[derive(Default)]
    struct FakeKeyBackupService {
        fail_generation: bool,
        fail_creation: bool,
        created: Mutex<Vec<BackupCreationInfo>>,
    }

    #[async_trait]
    impl KeyBackupService for FakeKeyBackupService {
        async fn generate_recovery_key(&self) -> Result<(RecoveryKey, BackupCreationInfo)> {
            if self.fail_generation {
                return Err(Error::GenerationFailed("no entropy".into()));
            }
            Ok((RecoveryKey::new(KEY), info()))
        }

        async fn create_backup_version(&self, info: &BackupCreationInfo) -> Result<KeysVersion> {
            if self.fail_creation {
                return Err(Error::BackupCreationFailed("server error".into()));
            }
            self.created.lock().push(info.clone());
            Ok(KeysVersion {
                version: "1".into(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingShareTarget {
        shared: Mutex<Vec<(String, String)>>,
    }

    impl ShareTarget for RecordingShareTarget {
        fn share(&self, request: &ShareRequest) {
            self.shared
                .lock()
                .push((request.subject.clone(), request.text.clone()));
        }
    }

    fn info() -> BackupCreationInfo {
        BackupCreationInfo {
            algorithm: "m.megolm_backup.v1.curve25519-aes-sha2".into(),
            auth_data: serde_json::json!({ "public_key": "abc" }),
        }
    }

    async fn ready_step() -> KeyBackupStep {
        let mut step = KeyBackupStep::default();
        step.enter(&FakeKeyBackupService::default()).await;
        step
    }

    #[tokio::test]
    async fn test_enter_generates_key() {
        let step = ready_step().await;

        assert_eq!(step.state().phase, KeyBackupPhase::KeyReady);
        assert_eq!(step.state().megolm_backup_creation_info, Some(info()));

        let view = step.view();
        assert!(!view.spinner_visible);
        assert_eq!(view.key_text.as_deref(), Some(FORMATTED));
        assert!(view.copy_visible && view.finish_visible);
    }

    #[tokio::test]
    async fn test_enter_again_keeps_existing_key() {
        let mut step = ready_step().await;
        let service = FakeKeyBackupService {
            fail_generation: true,
            ..Default::default()
        };

        step.enter(&service).await;

        assert_eq!(step.state().phase, KeyBackupPhase::KeyReady);
        assert!(step.state().prepare_recovery_error.is_none());
    }

    #[test]
    fn test_enter_from_sync_host() {
        let mut step = KeyBackupStep::default();

        tokio_test::block_on(step.enter(&FakeKeyBackupService::default()));

        assert!(step.state().has_recovery_key());
    }

    #[test]
    fn test_spinner_while_generating() {
        let mut step = KeyBackupStep::default();
        assert!(step.begin_generation());

        let view = step.view();
        assert!(view.spinner_visible);
        assert!(view.status_text.is_some());
        assert!(view.key_text.is_none());
        assert!(!view.copy_visible && !view.finish_visible);
    }

    #[tokio::test]
    async fn test_finish_without_copy_reminds() {
        let mut step = ready_step().await;
        let service = FakeKeyBackupService::default();

        let result = step.run_finish(&service).await;

        assert_eq!(result, FinishResult::Reminder("Please make a copy".into()));
        assert!(service.created.lock().is_empty());
        assert_eq!(step.state().phase, KeyBackupPhase::KeyReady);
    }

    #[test]
    fn test_finish_without_creation_info_does_nothing() {
        let mut step = KeyBackupStep::default();

        assert_eq!(step.finish(), FinishOutcome::NotReady);
        assert!(!step.state().is_creating_backup_version);
    }

    #[tokio::test]
    async fn test_share_sends_formatted_key() {
        let mut step = ready_step().await;
        let target = RecordingShareTarget::default();

        assert!(step.share_key(&target));

        assert!(step.state().copy_has_been_made);
        assert_eq!(
            target.shared.lock().as_slice(),
            &[("Recovery Key".to_string(), FORMATTED.to_string())]
        );
    }

    #[test]
    fn test_share_without_key_is_noop() {
        let mut step = KeyBackupStep::default();
        let target = RecordingShareTarget::default();

        assert!(!step.share_key(&target));
        assert!(!step.state().copy_has_been_made);
        assert!(target.shared.lock().is_empty());
    }

    #[tokio::test]
    async fn test_copy_then_finish_completes() {
        let mut step = ready_step().await;
        let service = FakeKeyBackupService::default();
        step.share_key(&RecordingShareTarget::default());

        let result = step.run_finish(&service).await;

        let version = KeysVersion {
            version: "1".into(),
        };
        assert_eq!(result, FinishResult::Exit(StepExit::Completed(version.clone())));
        assert_eq!(step.state().keys_version_result, Some(version));
        assert_eq!(step.state().phase, KeyBackupPhase::Done);
        assert_eq!(service.created.lock().as_slice(), &[info()]);
    }

    #[tokio::test]
    async fn test_waiting_view_while_creating() {
        let mut step = ready_step().await;
        step.share_key(&RecordingShareTarget::default());

        assert!(matches!(step.finish(), FinishOutcome::CreateBackup(_)));
        assert!(step.view().waiting_view);
        assert_eq!(step.finish(), FinishOutcome::NotReady);

        step.complete_backup(Ok(KeysVersion {
            version: "7".into(),
        }));
        assert!(!step.view().waiting_view);
    }

    #[tokio::test]
    async fn test_generation_failure_shows_unknown_error() {
        let mut step = KeyBackupStep::default();
        let service = FakeKeyBackupService {
            fail_generation: true,
            ..Default::default()
        };

        step.enter(&service).await;

        assert_eq!(step.state().phase, KeyBackupPhase::Error);
        let dialog = step.view().dialog.unwrap();
        assert_eq!(dialog.title, "Unknown error");
        assert!(dialog.message.contains("no entropy"));

        assert_eq!(step.acknowledge_error(), Some(StepExit::NavigateBack));
        assert!(step.view().dialog.is_none());
    }

    #[tokio::test]
    async fn test_creation_failure_shows_unexpected_error() {
        let mut step = ready_step().await;
        step.share_key(&RecordingShareTarget::default());
        let service = FakeKeyBackupService {
            fail_creation: true,
            ..Default::default()
        };

        let result = step.run_finish(&service).await;

        assert_eq!(result, FinishResult::Failed);
        assert!(!step.state().is_creating_backup_version);
        assert!(step.state().keys_version_result.is_none());
        assert_eq!(step.view().dialog.unwrap().title, "Unexpected error");

        assert_eq!(step.acknowledge_error(), Some(StepExit::NavigateBack));
        assert!(step.state().creating_backup_error.is_none());
        assert_eq!(step.state().phase, KeyBackupPhase::KeyReady);
    }

    #[tokio::test]
    async fn test_backup_version_is_created_once() {
        let mut step = ready_step().await;
        let service = FakeKeyBackupService::default();
        step.share_key(&RecordingShareTarget::default());

        let first = step.run_finish(&service).await;
        let second = step.run_finish(&service).await;

        assert!(matches!(first, FinishResult::Exit(StepExit::Completed(_))));
        assert_eq!(second, FinishResult::NotReady);
        assert_eq!(service.created.lock().len(), 1);
        assert_eq!(step.state().phase, KeyBackupPhase::Done);
    }

    #[tokio::test]
    async fn test_finish_ignored_while_error_dialog_open() {
        let mut step = ready_step().await;
        step.share_key(&RecordingShareTarget::default());
        let failing = FakeKeyBackupService {
            fail_creation: true,
            ..Default::default()
        };
        assert_eq!(step.run_finish(&failing).await, FinishResult::Failed);

        let service = FakeKeyBackupService::default();
        assert_eq!(step.run_finish(&service).await, FinishResult::NotReady);

        assert!(service.created.lock().is_empty());
        assert_eq!(step.state().phase, KeyBackupPhase::Error);
        assert!(step.view().dialog.is_some());
    }

    #[test]
    fn test_acknowledge_without_error() {
        let mut step = KeyBackupStep::default();
        assert_eq!(step.acknowledge_error(), None);
    }

    #[test]
    fn test_late_backup_result_is_ignored() {
        let mut step = KeyBackupStep::default();

        let exit = step.complete_backup(Ok(KeysVersion {
            version: "1".into(),
        }));

        assert!(exit.is_none());
        assert!(step.state().keys_version_result.is_none());
    }

    #[test]
    fn test_view_debug_hides_key() {
        let mut step = KeyBackupStep::default();
        step.complete_generation(Ok((RecoveryKey::new(KEY), info())));

        assert!(!format!("{:?}", step.view()).contains("abcd"));
    }
}
