//! `tracing` subscriber setup
//!
//! The text backend emits through whatever subscriber the process installs.
//! Applications that do not set one up themselves can call
//! [`init_subscriber`] once at startup.

use tracing_subscriber::EnvFilter;

/// Build the filter: RUST_LOG if set, otherwise `default_filter`
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install a plain-text fmt subscriber on stderr
///
/// Safe to call multiple times; only the first call installs anything.
/// Returns whether this call installed the subscriber.
pub fn init_subscriber(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        // The first call may lose to another test's subscriber; the second never wins
        let _ = init_subscriber("info");
        assert!(!init_subscriber("debug"));
    }

    #[test]
    fn test_env_filter_falls_back_to_default() {
        if std::env::var("RUST_LOG").is_err() {
            let filter = env_filter("rh_logger=debug");
            assert_eq!(filter.to_string(), "rh_logger=debug");
        }
    }
}
