//! Tracing subscriber setup

use crate::config::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Calling this twice is
/// harmless; the second attempt is reported and ignored.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&config.level)));

    let result = if config.format.eq_ignore_ascii_case("json") {
        fmt().with_env_filter(filter).json().try_init()
    } else {
        fmt().with_env_filter(filter).with_target(false).try_init()
    };

    if let Err(e) = result {
        tracing::warn!(error = %e, "tracing init failed");
    }
}

/// Crate-scoped directive so dependencies stay at `warn`
fn filter_directive(level: &str) -> String {
    format!("warn,tourmap={}", level.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("DEBUG"), "warn,tourmap=debug");
        assert!(EnvFilter::try_new(filter_directive("info")).is_ok());
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        let config = LoggingConfig::default();
        init(&config);
        init(&config);
    }
}
