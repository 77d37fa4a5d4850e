//! Core types for the request execution layer
//!
//! - [`request`] - HTTP method, per-phase timeouts and the prepared request
//! - [`result`] - The uniform [`ApiResult`] returned for every call

pub mod request;
pub mod result;

pub use request::{form_encode, HttpMethod, RequestOptions, RequestPayload, Timeouts, DEFAULT_TIMEOUT};
pub use result::{ApiResult, TRANSPORT_FAILURE_BODY, TRANSPORT_FAILURE_STATUS};
