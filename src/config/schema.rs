//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Signal subsystem settings.
    pub signals: SignalConfig,

    /// Swap file settings.
    pub swap: SwapConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Signal subsystem configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Unblock all signals on the main thread at startup.
    pub clear_mask: bool,

    /// Prefix of the crash message ("<prefix>: Caught deadly signal ...").
    pub crash_prefix: String,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            clear_mask: true,
            crash_prefix: "crashsafe".to_string(),
        }
    }
}

/// Swap file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SwapConfig {
    /// Directory holding `<buffer>.swp` files.
    pub directory: PathBuf,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(".crashsafe-swap"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [signals]
            crash_prefix = "ed"

            [observability]
            metrics_enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(config.signals.crash_prefix, "ed");
        assert!(config.signals.clear_mask);
        assert_eq!(config.swap.directory, PathBuf::from(".crashsafe-swap"));
        assert!(config.observability.metrics_enabled);
        assert_eq!(config.observability.log_level, "info");
    }
}
