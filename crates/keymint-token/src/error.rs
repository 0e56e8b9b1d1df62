//! Error types for the token codec.

use thiserror::Error;

/// Errors that can occur while packing or unpacking an API key token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Refused to encode a token without secret material.
    #[error("private secret must not be empty")]
    EmptySecret,

    /// The presented token is not valid base64.
    #[error("failed to decode token: {0}")]
    DecodeFailed(String),

    /// The decoded buffer has no room for the two identifiers.
    #[error("decoded token too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },
}
