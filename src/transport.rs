//! HTTP transport capability
//!
//! A [`Transport`] sends one prepared [`RequestOptions`] and hands back whatever
//! the server answered. Anything short of a response (refused connection,
//! timeout, broken socket) is a [`TransportError`]; the executor turns those
//! into a synthetic 500 result.

use crate::types::{RequestOptions, RequestPayload, Timeouts};
use crate::{Result, VeritransError};
use async_trait::async_trait;
use http::HeaderMap;
use reqwest::{redirect, Client};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Socket-level failure: no HTTP response was received
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),
    /// A phase exceeded its budget
    #[error("{phase} timed out after {budget:?}")]
    Timeout { phase: Phase, budget: Duration },
    /// The connection broke mid-flight
    #[error("i/o error: {0}")]
    Io(String),
}

/// Network phase a timeout is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connect,
    /// Connecting and writing the request, up to the response head
    Write,
    Read,
}

impl Phase {
    /// Budget this phase is allowed under `timeouts`
    pub fn budget(&self, timeouts: &Timeouts) -> Duration {
        match self {
            Phase::Connect => timeouts.connect,
            Phase::Write => timeouts.connect + timeouts.write,
            Phase::Read => timeouts.read,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Connect => "connect",
            Phase::Write => "write",
            Phase::Read => "read",
        })
    }
}

impl TransportError {
    fn timeout(phase: Phase, timeouts: &Timeouts) -> Self {
        TransportError::Timeout {
            phase,
            budget: phase.budget(timeouts),
        }
    }
}

/// Response as received from the wire
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

/// Sends a single prepared request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform exactly one attempt; never retries
    async fn send(
        &self,
        request: &RequestOptions,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport whose connect and read phases are bounded by `timeouts`
    ///
    /// Redirects are never followed: a 3xx is returned to the caller like any
    /// other status. The write phase has no dedicated knob in `reqwest`; it is
    /// enforced per request in [`Transport::send`].
    pub fn new(timeouts: Timeouts) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .read_timeout(timeouts.read)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| VeritransError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client
    ///
    /// The client's own redirect policy applies; build it with
    /// `redirect::Policy::none()` to keep one call per request.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn classify(err: reqwest::Error, phase: Phase, request: &RequestOptions) -> TransportError {
        if err.is_timeout() {
            let phase = if err.is_connect() { Phase::Connect } else { phase };
            TransportError::timeout(phase, &request.timeouts)
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Io(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &RequestOptions,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.clone())
            .headers(request.headers.clone());

        if let RequestPayload::Body(body) = &request.payload {
            builder = builder.body(body.clone());
        }

        let timeouts = &request.timeouts;

        // Connect + write, up to the response head
        let response = tokio::time::timeout(Phase::Write.budget(timeouts), builder.send())
            .await
            .map_err(|_| TransportError::timeout(Phase::Write, timeouts))?
            .map_err(|e| Self::classify(e, Phase::Write, request))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = tokio::time::timeout(Phase::Read.budget(timeouts), response.text())
            .await
            .map_err(|_| TransportError::timeout(Phase::Read, timeouts))?
            .map_err(|e| Self::classify(e, Phase::Read, request))?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
