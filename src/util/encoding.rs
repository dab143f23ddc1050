//! Identifier encoding.
//!
//! Run names and step ids can contain characters that do not survive a URL
//! path segment, so the dashboard sends them base64 encoded.

use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("Identifier '{0}' is not valid base64")]
    InvalidBase64(String),
    #[error("Identifier '{0}' does not decode to UTF-8 text")]
    InvalidUtf8(String),
}

/// Decode a base64 encoded identifier.
///
/// Accepts the standard alphabet and the URL-safe one, padded or not.
pub fn decode_identifier(encoded: &str) -> Result<String, IdentifierError> {
    let bytes = STANDARD
        .decode(encoded)
        .or_else(|_| URL_SAFE.decode(encoded))
        .or_else(|_| URL_SAFE_NO_PAD.decode(encoded))
        .map_err(|_| IdentifierError::InvalidBase64(encoded.to_string()))?;
    String::from_utf8(bytes).map_err(|_| IdentifierError::InvalidUtf8(encoded.to_string()))
}

/// Encode an identifier the way the dashboard does.
pub fn encode_identifier(raw: &str) -> String {
    STANDARD.encode(raw.as_bytes())
}
