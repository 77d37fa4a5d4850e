//! Basic authentication for the Veritrans API

use base64::{engine::general_purpose, Engine as _};

/// Build the `Authorization` value for a server key
///
/// The key is used as the username with an empty password, strictly Base64
/// encoded with padding.
pub fn basic_auth_header(server_key: &str) -> String {
    let key = general_purpose::STANDARD.encode(format!("{}:", server_key));
    format!("Basic {}", key)
}
