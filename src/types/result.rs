//! Uniform outcome of a single API call

use super::request::RequestOptions;
use crate::serializer::JsonSerializer;
use serde_json::{Map, Value};
use std::time::Duration;

/// Status reported when no response was received from the backend
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

/// Body synthesized when no response was received from the backend
pub const TRANSPORT_FAILURE_BODY: &str = r#"{"status_code": "500", "status_message": "Internal server error, no response from backend. Try again later"}"#;

/// Outcome of one request, whether answered by the server or synthesized
/// after a transport failure.
///
/// Constructed once by the executor and never mutated afterwards. HTTP error
/// statuses are ordinary results; inspect [`ApiResult::status_code`].
#[derive(Debug, Clone)]
pub struct ApiResult {
    status_code: u16,
    raw_body: String,
    data: Value,
    request_url: String,
    request_options: RequestOptions,
    elapsed: Duration,
}

impl ApiResult {
    /// Build a result from a response that actually arrived
    ///
    /// A body that is not valid JSON leaves `data` as an empty object; the
    /// raw text is still available through [`ApiResult::body`].
    pub fn from_response(
        status_code: u16,
        raw_body: String,
        request_url: impl Into<String>,
        request_options: RequestOptions,
        elapsed: Duration,
        serializer: &dyn JsonSerializer,
    ) -> Self {
        let data = match serializer.decode(&raw_body) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Veritrans: response body is not valid JSON: {}", e);
                Value::Object(Map::new())
            }
        };

        Self {
            status_code,
            raw_body,
            data,
            request_url: request_url.into(),
            request_options,
            elapsed,
        }
    }

    /// Build the synthetic result standing in for a missing response
    pub fn transport_failure(
        request_url: impl Into<String>,
        request_options: RequestOptions,
        elapsed: Duration,
        serializer: &dyn JsonSerializer,
    ) -> Self {
        Self::from_response(
            TRANSPORT_FAILURE_STATUS,
            TRANSPORT_FAILURE_BODY.to_string(),
            request_url,
            request_options,
            elapsed,
            serializer,
        )
    }

    /// Record the attempt duration as the last step of construction
    pub(crate) fn stamp_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// HTTP status, or 500 when the transport failed
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Whether the status is below 300
    pub fn is_success(&self) -> bool {
        self.status_code < 300
    }

    /// Raw response payload
    pub fn body(&self) -> &str {
        &self.raw_body
    }

    /// Parsed response payload
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Look up a top-level field of the parsed payload
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// `status_message` field reported by the API, if any
    pub fn status_message(&self) -> Option<&str> {
        self.get("status_message").and_then(Value::as_str)
    }

    /// URL the caller asked for
    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    /// Request that produced this result
    pub fn request_options(&self) -> &RequestOptions {
        &self.request_options
    }

    /// Wall-clock duration of the attempt
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Wall-clock duration of the attempt in seconds
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::SerdeJsonSerializer;
    use crate::types::{HttpMethod, Timeouts};
    use serde_json::json;
    use url::Url;

    fn options() -> RequestOptions {
        let url = Url::parse("https://api.sandbox.veritrans.co.id/v2/charge").unwrap();
        RequestOptions::new(
            HttpMethod::Post,
            &url,
            &json!({}),
            "{}".to_string(),
            "Basic abc",
            "agent",
            Timeouts::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_result_from_response() {
        let result = ApiResult::from_response(
            201,
            r#"{"status_code":"201","status_message":"Success"}"#.to_string(),
            "https://api.sandbox.veritrans.co.id/v2/charge",
            options(),
            Duration::from_millis(120),
            &SerdeJsonSerializer,
        );

        assert_eq!(result.status_code(), 201);
        assert!(result.is_success());
        assert_eq!(result.status_message(), Some("Success"));
        assert_eq!(result.get("status_code"), Some(&json!("201")));
        assert!((result.elapsed_seconds() - 0.12).abs() < 1e-9);
    }

    #[test]
    fn test_result_with_non_json_body() {
        let result = ApiResult::from_response(
            502,
            "<html>Bad Gateway</html>".to_string(),
            "https://api.sandbox.veritrans.co.id/v2/charge",
            options(),
            Duration::ZERO,
            &SerdeJsonSerializer,
        );

        assert!(!result.is_success());
        assert_eq!(result.body(), "<html>Bad Gateway</html>");
        assert_eq!(result.data(), &json!({}));
    }

    #[test]
    fn test_transport_failure_result() {
        let result = ApiResult::transport_failure(
            "https://api.sandbox.veritrans.co.id/v2/charge",
            options(),
            Duration::from_secs(40),
            &SerdeJsonSerializer,
        );

        assert_eq!(result.status_code(), 500);
        assert_eq!(result.body(), TRANSPORT_FAILURE_BODY);
        assert_eq!(result.get("status_code"), Some(&json!("500")));
        assert!(result.status_message().unwrap().contains("Try again later"));
    }
}
