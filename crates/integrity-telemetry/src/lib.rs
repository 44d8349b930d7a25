//! # Integrity Telemetry
//!
//! Logging setup shared by the SHA-Infinity binaries and tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use integrity_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SI_SERVICE_NAME` | `sha-infinity` | Service name in events |
//! | `SI_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `SI_JSON_LOGS` | `false` | JSON lines instead of text |
//! | `SI_CONSOLE_OUTPUT` | `true` | Write events to stderr |

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience macro for creating a span with component context.
///
/// # Example
///
/// ```rust,ignore
/// use integrity_telemetry::component_span;
///
/// fn verify_file() {
///     let _span = component_span!("verify_file", component = "cli", path = "state.json").entered();
/// }
/// ```
#[macro_export]
macro_rules! component_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
