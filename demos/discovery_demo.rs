//! # Discovery Settings Demo
//!
//! Walks the discovery settings screen against an in-memory identity server:
//! initial load, sharing an email, revoking a phone number and disconnecting.
//!
//! ## Run
//!
//! ```bash
//! cargo run --example discovery_demo
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use messenger_settings_core::discovery::{
    ChannelListener, DiscoveryController, DiscoveryCoordinator, DiscoveryIntent, IdentityService,
    IdentifierControl, PidKind, RowKind, SettingsRow, SharedState,
};
use messenger_settings_core::{logging, CoreConfig, Result};
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;

/// Identity server kept in memory. Sharing an email needs a confirmation
/// link, so it goes to Pending; phone numbers are shared immediately.
struct InMemoryIdentityServer {
    server: Mutex<Option<String>>,
    emails: Mutex<Vec<(String, SharedState)>>,
    phones: Mutex<Vec<(String, SharedState)>>,
}

impl InMemoryIdentityServer {
    fn entries(&self, kind: PidKind) -> &Mutex<Vec<(String, SharedState)>> {
        match kind {
            PidKind::Email => &self.emails,
            PidKind::Phone => &self.phones,
        }
    }

    fn update(&self, kind: PidKind, value: &str, shared: SharedState) -> SharedState {
        for entry in self.entries(kind).lock().iter_mut() {
            if entry.0 == value {
                entry.1 = shared;
            }
        }
        shared
    }
}

#[async_trait]
impl IdentityService for InMemoryIdentityServer {
    fn identity_server_url(&self) -> Option<String> {
        self.server.lock().clone()
    }

    async fn set_identity_server(&self, url: Option<String>) -> Result<()> {
        *self.server.lock() = url;
        Ok(())
    }

    async fn bind_identifier(&self, kind: PidKind, value: &str) -> Result<SharedState> {
        let shared = match kind {
            PidKind::Email => SharedState::Pending,
            PidKind::Phone => SharedState::Shared,
        };
        Ok(self.update(kind, value, shared))
    }

    async fn unbind_identifier(&self, kind: PidKind, value: &str) -> Result<SharedState> {
        Ok(self.update(kind, value, SharedState::NotShared))
    }

    async fn list_bound_identifiers(&self, kind: PidKind) -> Result<Vec<(String, SharedState)>> {
        Ok(self.entries(kind).lock().clone())
    }
}

fn print_rows(rows: &[SettingsRow]) {
    println!("  ┌────────────────────────────────────────────────────────────┐");
    for row in rows {
        let text = match &row.kind {
            RowKind::SectionTitle { title } => format!("== {} ==", title),
            RowKind::Item { description, .. } => description.clone(),
            RowKind::Info { helper_text } => format!("({})", helper_text),
            RowKind::Button { title, .. } => format!("[ {} ]", title),
            RowKind::Loading { text } => format!("... {}", text.as_deref().unwrap_or("")),
            RowKind::Failure { message, .. } => format!("! {}", message),
            RowKind::Identifier { title, control, .. } => match control {
                IdentifierControl::Indeterminate => format!("{}  [ - ]", title),
                IdentifierControl::Switch { checked: true } => format!("{}  [ON ]", title),
                IdentifierControl::Switch { checked: false } => format!("{}  [OFF]", title),
                IdentifierControl::Pending { label, .. } => format!("{}  <{}>", title, label),
            },
        };
        println!("  │ {:<16} {}", row.id, text);
    }
    println!("  └────────────────────────────────────────────────────────────┘");
    println!();
}

async fn drain(
    coordinator: &DiscoveryCoordinator<InMemoryIdentityServer>,
    intents: &mut UnboundedReceiver<DiscoveryIntent>,
) {
    while let Ok(intent) = intents.try_recv() {
        println!("  intent: {:?}", intent);
        if let Some(navigation) = coordinator.handle_intent(intent).await {
            println!("  navigate: {:?}", navigation);
        }
    }
}

#[tokio::main]
async fn main() {
    println!("=== Settings Core: Discovery Demo ===\n");

    let service = Arc::new(InMemoryIdentityServer {
        server: Mutex::new(Some("https://is.example.org".into())),
        emails: Mutex::new(vec![
            ("alice@example.org".into(), SharedState::NotShared),
            ("alice@work.example".into(), SharedState::Unknown),
        ]),
        phones: Mutex::new(vec![("447700900123".into(), SharedState::Shared)]),
    });
    let config = CoreConfig {
        default_identity_server: Some("https://vector.im".into()),
        ..CoreConfig::from_env()
    };
    if let Err(e) = logging::init(&config) {
        println!("  [WARN] {}", e);
    }
    let coordinator = DiscoveryCoordinator::new(service, config);

    let (listener, mut intents) = ChannelListener::new();
    let controller = DiscoveryController::new(Some(Arc::new(listener)));

    // Step 1: Initial load
    println!("Step 1: Loading bound identifiers...");
    coordinator.refresh().await;
    let rows = controller.render(Some(&coordinator.snapshot()));
    print_rows(&rows);

    // Step 2: Share the email address
    println!("Step 2: Sharing alice@example.org...");
    if let Some(interaction) = rows
        .iter()
        .find(|row| row.id == "alice@example.org")
        .and_then(|row| row.switch_changed(true))
    {
        controller.dispatch(interaction);
    }
    drain(&coordinator, &mut intents).await;
    print_rows(&controller.render(Some(&coordinator.snapshot())));

    // Step 3: Revoke the phone number
    println!("Step 3: Revoking 447700900123...");
    let rows = controller.render(Some(&coordinator.snapshot()));
    if let Some(interaction) = rows
        .iter()
        .find(|row| row.id == "447700900123")
        .and_then(|row| row.switch_changed(false))
    {
        controller.dispatch(interaction);
    }
    drain(&coordinator, &mut intents).await;
    print_rows(&controller.render(Some(&coordinator.snapshot())));

    // Step 4: Open the picker, then disconnect
    println!("Step 4: Opening the picker and disconnecting...");
    let rows = controller.render(Some(&coordinator.snapshot()));
    for id in ["idServer", "remove"] {
        if let Some(interaction) = rows.iter().find(|row| row.id == id).and_then(SettingsRow::click) {
            controller.dispatch(interaction);
        }
    }
    drain(&coordinator, &mut intents).await;
    print_rows(&controller.render(Some(&coordinator.snapshot())));

    // Step 5: Snapshot for the host UI
    println!("Step 5: JSON snapshot");
    match coordinator.snapshot().to_json() {
        Ok(json) => println!("  {}", json),
        Err(e) => println!("  [FAILED] {}", e),
    }

    println!("\n=== Demo Complete ===");
}
