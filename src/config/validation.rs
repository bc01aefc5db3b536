//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::signals::deadly::MESSAGE_CAPACITY;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Longest accepted crash prefix, in bytes. Keeps the signal name and the
/// line ending inside the crash message buffer.
pub const MAX_CRASH_PREFIX: usize = 64;

const _: () = assert!(MAX_CRASH_PREFIX + 64 <= MESSAGE_CAPACITY);

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("signals.crash_prefix must not be empty")]
    EmptyCrashPrefix,

    #[error("signals.crash_prefix must not contain control characters")]
    ControlCharInPrefix,

    #[error("signals.crash_prefix is {0} bytes, the limit is {max}", max = MAX_CRASH_PREFIX)]
    CrashPrefixTooLong(usize),

    #[error("swap.directory must not be empty")]
    EmptySwapDirectory,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    BadMetricsAddress(String),
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let prefix = &config.signals.crash_prefix;
    if prefix.is_empty() {
        errors.push(ValidationError::EmptyCrashPrefix);
    } else if prefix.chars().any(char::is_control) {
        errors.push(ValidationError::ControlCharInPrefix);
    }
    if prefix.len() > MAX_CRASH_PREFIX {
        errors.push(ValidationError::CrashPrefixTooLong(prefix.len()));
    }

    if config.swap.directory.as_os_str().is_empty() {
        errors.push(ValidationError::EmptySwapDirectory);
    }

    let level = &config.observability.log_level;
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(level.clone()));
    }

    let addr = &config.observability.metrics_address;
    if config.observability.metrics_enabled && addr.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadMetricsAddress(addr.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = AppConfig::default();
        config.signals.crash_prefix = "bad\nprefix".into();
        config.swap.directory = PathBuf::new();
        config.observability.log_level = "loud".into();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ControlCharInPrefix,
                ValidationError::EmptySwapDirectory,
                ValidationError::UnknownLogLevel("loud".into()),
                ValidationError::BadMetricsAddress("nowhere".into()),
            ]
        );
    }

    #[test]
    fn test_crash_prefix_length_capped() {
        let mut config = AppConfig::default();
        config.signals.crash_prefix = "x".repeat(MAX_CRASH_PREFIX);
        assert!(validate_config(&config).is_ok());

        config.signals.crash_prefix.push('x');
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::CrashPrefixTooLong(MAX_CRASH_PREFIX + 1)]
        );
    }

    #[test]
    fn test_longest_prefix_keeps_message_whole() {
        use std::fmt::Write;

        let prefix = "x".repeat(MAX_CRASH_PREFIX);
        let mut message: crate::signals::MessageBuffer = crate::signals::MessageBuffer::new();
        write!(message, "{}: Caught deadly signal '{}'\r\n", prefix, "Unknown").unwrap();
        assert!(message.as_str().ends_with("'Unknown'\r\n"));
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());
    }
}
