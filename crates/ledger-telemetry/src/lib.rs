//! # Ledger Telemetry
//!
//! Observability for the PoW ledger.
//!
//! ## Components
//!
//! - Structured logging: `tracing-subscriber` with env filter, plain or JSON
//! - Metrics: a [`PrometheusObserver`] that plugs into the ledger's
//!   observer port and renders the Prometheus text format
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_logging, PrometheusObserver, TelemetryConfig};
//! use prometheus::Registry;
//!
//! init_logging(&TelemetryConfig::from_env())?;
//! let observer = PrometheusObserver::register(&Registry::new())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LEDGER_SERVICE_NAME` | `pow-ledger` | Service name attached to logs |
//! | `LEDGER_LOG_LEVEL` or `RUST_LOG` | `info` | Log level filter |
//! | `LEDGER_JSON_LOGS` | `false` | Emit JSON lines instead of text |
//! | `LEDGER_THREAD_IDS` | `false` | Include thread ids in log lines |

#![warn(missing_docs)]

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::PrometheusObserver;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// A collector could not be created or registered
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Metrics could not be encoded
    #[error("Failed to encode metrics: {0}")]
    Encode(String),
}

impl From<prometheus::Error> for TelemetryError {
    fn from(err: prometheus::Error) -> Self {
        Self::MetricsInit(err.to_string())
    }
}

/// Log a record-related event with standard fields.
///
/// ```rust,ignore
/// log_record_event!(info, "Record appended", record.index(), record.digest(), nonce = 42);
/// ```
#[macro_export]
macro_rules! log_record_event {
    ($level:ident, $msg:expr, $index:expr, $digest:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            record_index = $index,
            record_digest = %$digest,
            $($($field)*,)?
            $msg
        )
    };
}
