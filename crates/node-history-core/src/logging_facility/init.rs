//! Logging initialization module

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Only the first call installs a subscriber; later calls are no-ops.
/// `RUST_LOG` overrides the profile's default filter.
///
/// - **Development**: human-readable logs, `node_history=debug`
/// - **Production**: JSON logs, `node_history=info`
/// - **Test**: bare registry; use `init_test_capture()` for assertions
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("node_history=debug")),
                )
                .with_writer(std::io::stderr)
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("node_history=info")),
                )
                .with_writer(std::io::stderr)
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}
