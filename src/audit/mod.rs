//! Audit trail for outbound API calls
//!
//! [`LoggingProxy`] wraps a [`RequestExecutor`] and records what was sent and
//! what came back to an [`AuditSink`]. The result handed to the caller is
//! exactly the one the executor produced; a failing sink never changes it.
//!
//! # Examples
//!
//! ```no_run
//! use veritrans::audit::{FileAuditSink, LoggingProxy};
//! use veritrans::{ClientConfig, HttpMethod, RequestExecutor};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> veritrans::Result<()> {
//! let config = ClientConfig::new("SB-Mid-server-abc123");
//! let url = config.url_for("/charge");
//! let executor = RequestExecutor::new(config)?;
//! let sink = FileAuditSink::open("log/veritrans.log")?;
//! let proxy = LoggingProxy::new(executor, Arc::new(sink));
//!
//! let result = proxy
//!     .execute_with_logging(HttpMethod::Post, &url, &json!({"payment_type": "gopay"}))
//!     .await?;
//! println!("{}", result.status_code());
//! # Ok(())
//! # }
//! ```

mod sink;

#[cfg(test)]
mod tests;

pub use sink::{AuditLevel, AuditSink, FileAuditSink, TracingAuditSink};

use crate::client::RequestExecutor;
use crate::types::{ApiResult, HttpMethod};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;

/// Executor wrapper that writes every call and its outcome to an audit sink
#[derive(Clone)]
pub struct LoggingProxy {
    executor: RequestExecutor,
    sink: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for LoggingProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingProxy")
            .field("executor", &self.executor)
            .field("sink", &"<sink>")
            .finish()
    }
}

impl LoggingProxy {
    /// Wrap `executor`, auditing to `sink`
    pub fn new(executor: RequestExecutor, sink: Arc<dyn AuditSink>) -> Self {
        Self { executor, sink }
    }

    /// Wrap `executor`, auditing through `tracing`
    pub fn with_tracing(executor: RequestExecutor) -> Self {
        Self::new(executor, Arc::new(TracingAuditSink))
    }

    /// Wrapped executor
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Same contract as [`RequestExecutor::execute`], plus audit entries
    /// before dispatch and after the result is known
    pub async fn execute_with_logging(
        &self,
        method: HttpMethod,
        url: &str,
        params: &Value,
    ) -> Result<ApiResult> {
        let config = self.executor.config();
        let short_url = config.short_url(url);
        let serializer = self.executor.serializer();

        let sent = serializer.encode(params)?;
        self.record(
            AuditLevel::Info,
            &format!("Perform {} \nSending: {}", short_url, sent),
        );

        let result = self.executor.execute(method, url, params, None).await?;

        let received = serializer
            .encode(result.data())
            .unwrap_or_else(|_| result.body().to_string());
        if result.status_code() < 300 {
            self.record(
                AuditLevel::Info,
                &format!("Success {} \nGot: {}\n", short_url, received),
            );
        } else {
            self.record(
                AuditLevel::Warn,
                &format!("Failed {} \nGot: {}\n", short_url, received),
            );
        }

        Ok(result)
    }

    /// GET through the proxy
    pub async fn get(&self, url: &str, params: &Value) -> Result<ApiResult> {
        self.execute_with_logging(HttpMethod::Get, url, params).await
    }

    /// POST through the proxy
    pub async fn post(&self, url: &str, params: &Value) -> Result<ApiResult> {
        self.execute_with_logging(HttpMethod::Post, url, params).await
    }

    /// DELETE through the proxy
    pub async fn delete(&self, url: &str, params: &Value) -> Result<ApiResult> {
        self.execute_with_logging(HttpMethod::Delete, url, params).await
    }

    fn record(&self, level: AuditLevel, message: &str) {
        if let Err(e) = self.sink.write(level, message) {
            tracing::warn!("Veritrans: audit sink rejected entry: {}", e);
        }
    }
}
