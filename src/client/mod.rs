//! Request executor for the Veritrans API
//!
//! [`RequestExecutor`] performs exactly one authenticated HTTP call per
//! invocation and always hands back an [`ApiResult`]:
//!
//! - a response from the server (any status, including 4xx/5xx) becomes a
//!   result carrying that status and parsed body;
//! - a socket-level failure becomes a synthetic result with status 500 and
//!   a fixed "Try again later" body;
//! - only a missing server key (or a request that cannot even be built) is
//!   returned as an error, before any network I/O happens.
//!
//! # Examples
//!
//! ```no_run
//! use veritrans::{ClientConfig, RequestExecutor};
//! use serde_json::json;
//!
//! # async fn example() -> veritrans::Result<()> {
//! let config = ClientConfig::new("SB-Mid-server-abc123");
//! let url = config.url_for("/charge");
//! let executor = RequestExecutor::new(config)?;
//!
//! let result = executor
//!     .post(&url, &json!({"payment_type": "bank_transfer"}))
//!     .await?;
//!
//! if result.is_success() {
//!     println!("charged: {}", result.body());
//! } else {
//!     println!("failed with {}: {:?}", result.status_code(), result.status_message());
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;


use crate::config::ClientConfig;
use crate::serializer::{JsonSerializer, SerdeJsonSerializer};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{ApiResult, HttpMethod, RequestOptions};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

pub use auth::basic_auth_header;

/// Executes authenticated requests against the Veritrans API
#[derive(Clone)]
pub struct RequestExecutor {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    serializer: Arc<dyn JsonSerializer>,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("config", &self.config)
            .field("transport", &"<transport>")
            .field("serializer", &"<serializer>")
            .finish()
    }
}

impl RequestExecutor {
    /// Create an executor using `reqwest` and `serde_json`
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeouts)?;
        Ok(Self::with_parts(
            config,
            Arc::new(transport),
            Arc::new(SerdeJsonSerializer),
        ))
    }

    /// Create an executor from explicit collaborators
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        serializer: Arc<dyn JsonSerializer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            serializer,
        }
    }

    /// Replace the transport
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Replace the serializer
    pub fn with_serializer(mut self, serializer: Arc<dyn JsonSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Serializer used for payloads
    pub fn serializer(&self) -> &dyn JsonSerializer {
        self.serializer.as_ref()
    }

    /// Perform one authenticated call
    ///
    /// `auth_header` replaces the Basic header derived from the server key.
    /// The server key is still required to be configured.
    pub async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        params: &Value,
        auth_header: Option<&str>,
    ) -> Result<ApiResult> {
        let server_key = self.config.server_key()?;

        let encoded_params = self.serializer.encode(params)?;
        tracing::info!("Veritrans: {} {} {}", method, url, encoded_params);

        let authorization = match auth_header {
            Some(header) => header.to_string(),
            None => basic_auth_header(server_key),
        };

        let parsed_url = Url::parse(url)?;
        let options = RequestOptions::new(
            method,
            &parsed_url,
            params,
            encoded_params,
            &authorization,
            &self.config.user_agent,
            self.config.timeouts,
        )?;

        let started = Instant::now();
        let outcome = self.transport.send(&options).await;

        // Timing covers decoding too, so it is stamped once the result exists
        let result = match outcome {
            Ok(response) => ApiResult::from_response(
                response.status,
                response.body,
                url,
                options,
                Duration::ZERO,
                self.serializer.as_ref(),
            ),
            Err(e) => {
                tracing::info!("Veritrans: socket error, can not connect ({})", e);
                ApiResult::transport_failure(
                    url,
                    options,
                    Duration::ZERO,
                    self.serializer.as_ref(),
                )
            }
        }
        .stamp_elapsed(started.elapsed());

        tracing::info!(
            "Veritrans: got {:.3} sec {} {}",
            result.elapsed_seconds(),
            result.status_code(),
            result.body()
        );

        Ok(result)
    }

    /// Like [`execute`](Self::execute), with the method given as a string
    pub async fn execute_str(
        &self,
        method: &str,
        url: &str,
        params: &Value,
        auth_header: Option<&str>,
    ) -> Result<ApiResult> {
        let method = method.parse::<HttpMethod>()?;
        self.execute(method, url, params, auth_header).await
    }

    /// GET `url`, sending `params` in the query string
    pub async fn get(&self, url: &str, params: &Value) -> Result<ApiResult> {
        self.execute(HttpMethod::Get, url, params, None).await
    }

    /// POST `params` as JSON to `url`
    pub async fn post(&self, url: &str, params: &Value) -> Result<ApiResult> {
        self.execute(HttpMethod::Post, url, params, None).await
    }

    /// DELETE `url` with `params` as JSON body
    pub async fn delete(&self, url: &str, params: &Value) -> Result<ApiResult> {
        self.execute(HttpMethod::Delete, url, params, None).await
    }
}
