//! JSON encode/decode capability
//!
//! The executor never calls `serde_json` directly for payloads; it goes through
//! a [`JsonSerializer`] chosen when the client is built.

use crate::Result;
use serde_json::Value;

/// Encodes request parameters and decodes response bodies
pub trait JsonSerializer: Send + Sync {
    /// Encode a value as JSON text
    fn encode(&self, value: &Value) -> Result<String>;

    /// Decode JSON text into a value
    fn decode(&self, text: &str) -> Result<Value>;
}

/// Default serializer backed by `serde_json`
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonSerializer;

impl JsonSerializer for SerdeJsonSerializer {
    fn encode(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode(&self, text: &str) -> Result<Value> {
        Ok(serde_json::from_str(text)?)
    }
}
