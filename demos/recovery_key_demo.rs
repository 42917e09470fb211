//! # Recovery Key Demo
//!
//! Walks the recovery key step of the key backup wizard: generation, the
//! copy reminder, sharing, backup creation, and a failed creation.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example recovery_key_demo
//! ```

use async_trait::async_trait;
use messenger_settings_core::keybackup::{
    BackupCreationInfo, FinishResult, KeyBackupService, KeyBackupStep, KeysVersion, RecoveryKey,
    ShareRequest, ShareTarget, StepView,
};
use messenger_settings_core::{logging, CoreConfig, Error, Result};

struct DemoCrypto {
    fail_creation: bool,
}

#[async_trait]
impl KeyBackupService for DemoCrypto {
    async fn generate_recovery_key(&self) -> Result<(RecoveryKey, BackupCreationInfo)> {
        Ok((
            RecoveryKey::new("EsTcLW2KPGiFwKEA3As5g5c4BXwkqeeJZJV8Q9fugUMNUE4d"),
            BackupCreationInfo {
                algorithm: "m.megolm_backup.v1.curve25519-aes-sha2".into(),
                auth_data: serde_json::json!({ "public_key": "demo" }),
            },
        ))
    }

    async fn create_backup_version(&self, _info: &BackupCreationInfo) -> Result<KeysVersion> {
        if self.fail_creation {
            return Err(Error::BackupCreationFailed("M_FORBIDDEN".into()));
        }
        Ok(KeysVersion {
            version: "42".into(),
        })
    }
}

struct Clipboard;

impl ShareTarget for Clipboard {
    fn share(&self, request: &ShareRequest) {
        println!("  Shared \"{}\":", request.subject);
        for line in request.text.lines() {
            println!("    {}", line);
        }
    }
}

fn print_view(view: &StepView) {
    if view.spinner_visible {
        println!("  [spinner] {}", view.status_text.as_deref().unwrap_or(""));
    }
    if let Some(text) = &view.key_text {
        println!("  ┌──────────────────────────┐");
        for line in text.lines() {
            println!("  │  {:<22}  │", line);
        }
        println!("  └──────────────────────────┘");
    }
    if view.copy_visible {
        println!("  [ Copy ]  [ Finish ]");
    }
    if view.waiting_view {
        println!("  [waiting]");
    }
    if let Some(dialog) = &view.dialog {
        println!("  ! {}: {}  [{}]", dialog.title, dialog.message, dialog.button);
    }
    println!();
}

#[tokio::main]
async fn main() {
    println!("=== Settings Core: Recovery Key Demo ===\n");

    if let Err(e) = logging::init(&CoreConfig::from_env()) {
        println!("  [WARN] {}", e);
    }

    let crypto = DemoCrypto {
        fail_creation: false,
    };
    let mut step = KeyBackupStep::default();

    // Step 1: Enter the step
    println!("Step 1: Entering the step...");
    step.begin_generation();
    print_view(&step.view());
    let generated = crypto.generate_recovery_key().await;
    step.complete_generation(generated);
    print_view(&step.view());

    // Step 2: Finish without a copy
    println!("Step 2: Pressing finish before making a copy...");
    match step.run_finish(&crypto).await {
        FinishResult::Reminder(message) => println!("  [OK] Reminder: {}\n", message),
        other => println!("  [FAILED] Unexpected {:?}\n", other),
    }

    // Step 3: Copy, then finish
    println!("Step 3: Copying the key...");
    step.share_key(&Clipboard);
    println!();

    println!("Step 4: Creating the backup version...");
    match step.run_finish(&crypto).await {
        FinishResult::Exit(exit) => println!("  [OK] {:?}\n", exit),
        other => println!("  [FAILED] Unexpected {:?}\n", other),
    }

    // Step 5: Failure path
    println!("Step 5: Backup creation rejected by the server...");
    let failing = DemoCrypto {
        fail_creation: true,
    };
    let mut step = KeyBackupStep::default();
    step.enter(&failing).await;
    step.share_key(&Clipboard);
    let result = step.run_finish(&failing).await;
    println!("  Result: {:?}", result);
    print_view(&step.view());
    println!("  Acknowledged: {:?}", step.acknowledge_error());

    println!("\n=== Demo Complete ===");
}
