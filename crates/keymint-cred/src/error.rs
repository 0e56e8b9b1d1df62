//! Error types for credential issuance and verification.

use thiserror::Error;

/// Errors that can occur while issuing or verifying API key credentials.
///
/// Caller-visible rejections (malformed token, unknown owner, expired key,
/// hash mismatch) are not errors; they surface as an absent verification
/// result. These variants cover the internal conditions.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// A credential part could not be serialized for storage.
    #[error("failed to serialize credential data: {0}")]
    Serialization(String),

    /// Stored credential data could not be parsed back. Indicates storage
    /// corruption or a type mismatch, never an invalid key.
    #[error("could not read stored credential data: {0}")]
    Deserialization(String),

    /// The host credential store failed.
    #[error("credential store error: {0}")]
    Store(String),

    /// The hash provider failed to encode a secret.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// A caller supplied a field that could not be parsed or used.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Token assembly failed.
    #[error(transparent)]
    Token(#[from] keymint_token::TokenError),
}
