//! Settings core configuration.
//!
//! Defaults suit a development build; hosts either fill [`CoreConfig`]
//! directly or load it from environment variables.

use std::env;

/// Default tracing filter when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "messenger_settings_core=info";

/// Configuration for the settings core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Identity server suggested when the user opens the server picker
    pub default_identity_server: Option<String>,
    /// `tracing-subscriber` filter directive
    pub log_filter: String,
    /// Enable verbose logging
    pub verbose_logging: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_identity_server: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            verbose_logging: cfg!(feature = "verbose-logging"),
        }
    }
}

impl CoreConfig {
    /// Load configuration from environment variables.
    ///
    /// - `SETTINGS_DEFAULT_IDENTITY_SERVER`
    /// - `SETTINGS_LOG`
    /// - `SETTINGS_VERBOSE` (`1` or `true`)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_identity_server: env::var("SETTINGS_DEFAULT_IDENTITY_SERVER")
                .ok()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            log_filter: env::var("SETTINGS_LOG").unwrap_or(defaults.log_filter),
            verbose_logging: env::var("SETTINGS_VERBOSE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.verbose_logging),
        }
    }

    /// Filter directive actually handed to the subscriber
    pub fn effective_log_filter(&self) -> String {
        if self.verbose_logging {
            "messenger_settings_core=debug".to_string()
        } else {
            self.log_filter.clone()
        }
    }
}
