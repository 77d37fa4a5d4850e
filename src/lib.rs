//! # Veritrans request execution layer
//!
//! Turns a method, a URL and a JSON parameter object into one authenticated
//! call against the Veritrans payment API, and hands back a uniform
//! [`ApiResult`] whatever happened on the wire.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use veritrans::{audit::FileAuditSink, ClientConfig, LoggingProxy, RequestExecutor};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("SB-Mid-server-abc123");
//!     let status_url = config.url_for("/order-101/status");
//!
//!     let executor = RequestExecutor::new(config)?;
//!     let proxy = LoggingProxy::new(executor, Arc::new(FileAuditSink::open("veritrans.log")?));
//!
//!     let result = proxy.get(&status_url, &json!({})).await?;
//!     println!("{} {:?}", result.status_code(), result.status_message());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`config`**: [`ClientConfig`], the read-only settings shared by every call
//! - **`types`**: [`HttpMethod`], [`RequestOptions`], [`ApiResult`]
//! - **`client`**: [`RequestExecutor`] and Basic-Auth header construction
//! - **`transport`**: the [`Transport`] capability and its `reqwest` implementation
//! - **`serializer`**: the [`JsonSerializer`] capability and its `serde_json` implementation
//! - **`audit`**: [`LoggingProxy`] and the audit sinks it writes to
//! - **`error`**: [`VeritransError`]
//!
//! ## Failure model
//!
//! Only configuration problems (no server key) and requests that cannot be
//! built are returned as `Err`. HTTP error statuses are ordinary results, and
//! a transport failure is reported as a synthetic result with status 500.

pub mod audit;
pub mod client;
pub mod config;
pub mod error;
pub mod serializer;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use audit::{AuditSink, LoggingProxy};
pub use client::RequestExecutor;
pub use config::ClientConfig;
pub use error::{Result, VeritransError};
pub use serializer::{JsonSerializer, SerdeJsonSerializer};
pub use transport::{Phase, ReqwestTransport, Transport, TransportError, TransportResponse};
pub use types::*;

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_executor_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RequestExecutor>();
        assert_send_sync::<LoggingProxy>();
        assert_send_sync::<ApiResult>();
    }
}
