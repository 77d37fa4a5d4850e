//! Outbound request description

use crate::{Result, VeritransError};
use http::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default budget for each network phase
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(40);

/// HTTP methods the Veritrans API is called with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    /// Uppercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = VeritransError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(VeritransError::invalid_request(format!(
                "Unsupported HTTP method: {}",
                other
            ))),
        }
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Delete => http::Method::DELETE,
        }
    }
}

/// Per-phase timeouts applied to a single attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Establishing the connection
    pub connect: Duration,
    /// Writing the request
    pub write: Duration,
    /// Reading the response
    pub read: Duration,
}

impl Timeouts {
    /// Use the same budget for every phase
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            connect: timeout,
            write: timeout,
            read: timeout,
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::uniform(DEFAULT_TIMEOUT)
    }
}

/// Where the encoded parameters travel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPayload {
    /// JSON document sent as the request body
    Body(String),
    /// Form-encoded query string; no body is sent
    Query(String),
}

/// Fully prepared request, built once per call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: HttpMethod,
    /// URL the request is dispatched to (query included for GET)
    pub url: Url,
    pub headers: HeaderMap,
    pub payload: RequestPayload,
    pub timeouts: Timeouts,
}

impl RequestOptions {
    /// Assemble headers and payload for one call
    ///
    /// `encoded_params` is the JSON text of `params`. For GET it is discarded
    /// and `params` are form-encoded into the query string instead.
    pub fn new(
        method: HttpMethod,
        url: &Url,
        params: &Value,
        encoded_params: String,
        authorization: &str,
        user_agent: &str,
        timeouts: Timeouts,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value(authorization, "Authorization")?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        // Kept for GET as well, even though no body is sent
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, header_value(user_agent, "User-Agent")?);

        let mut url = url.clone();
        url.set_fragment(None);

        let payload = match method {
            HttpMethod::Get => {
                let query = form_encode(params)?;
                url.set_query(if query.is_empty() { None } else { Some(query.as_str()) });
                RequestPayload::Query(query)
            }
            HttpMethod::Post | HttpMethod::Delete => RequestPayload::Body(encoded_params),
        };

        Ok(Self {
            method,
            url,
            headers,
            payload,
            timeouts,
        })
    }

    /// Request body, if this request carries one
    pub fn body(&self) -> Option<&str> {
        match &self.payload {
            RequestPayload::Body(body) => Some(body),
            RequestPayload::Query(_) => None,
        }
    }

    /// Form-encoded query, if parameters travel in the URL
    pub fn query(&self) -> Option<&str> {
        match &self.payload {
            RequestPayload::Body(_) => None,
            RequestPayload::Query(query) => Some(query),
        }
    }

    /// Path component the request is dispatched to
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

fn header_value(value: &str, name: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| VeritransError::invalid_request(format!("Invalid {} header: {}", name, e)))
}

/// Encode a parameter object using `application/x-www-form-urlencoded` rules
///
/// Scalars are written verbatim, `null` becomes a bare key, arrays repeat the
/// key once per element and nested objects are written as JSON text.
pub fn form_encode(params: &Value) -> Result<String> {
    let map = match params {
        Value::Null => return Ok(String::new()),
        Value::Object(map) => map,
        other => {
            return Err(VeritransError::invalid_request(format!(
                "GET parameters must be an object, got {}",
                other
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => pairs.push(encode_component(key)),
            Value::Array(items) => {
                for item in items {
                    pairs.push(encode_pair(key, &scalar_text(item)));
                }
            }
            other => pairs.push(encode_pair(key, &scalar_text(other))),
        }
    }
    Ok(pairs.join("&"))
}

fn encode_component(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

fn encode_pair(key: &str, value: &str) -> String {
    format!("{}={}", encode_component(key), encode_component(value))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
