//! Packing and unpacking of the fixed-layout API key token.

use crate::error::TokenError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

/// Length of the identity prefix: two 16-byte UUIDs.
pub const IDENTITY_PREFIX_LEN: usize = 32;

/// The recovered parts of a presented API key token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    /// Id of the user the credential is claimed to belong to.
    pub owner_user_id: Uuid,
    /// Id of the credential record within the owner's credential set.
    pub credential_id: Uuid,
    /// The pre-hash secret bytes. May be empty for a malformed-but-decodable
    /// token; verification then fails on the hash compare, not here.
    pub private_secret: Vec<u8>,
}

/// Pack the identity prefix and private secret into a presentable token.
///
/// The result is `base64([owner][credential][secret])`. Deterministic, no
/// side effects. The issuance path always supplies a 32-byte secret; an
/// empty secret is refused since the resulting token would carry no secret
/// material at all.
pub fn encode(
    owner_user_id: Uuid,
    credential_id: Uuid,
    private_secret: &[u8],
) -> Result<String, TokenError> {
    if private_secret.is_empty() {
        return Err(TokenError::EmptySecret);
    }

    // Uuid::as_bytes yields the big-endian layout: most significant 64-bit
    // half first. Decode relies on the same ordering.
    let mut buffer = Vec::with_capacity(IDENTITY_PREFIX_LEN + private_secret.len());
    buffer.extend_from_slice(owner_user_id.as_bytes());
    buffer.extend_from_slice(credential_id.as_bytes());
    buffer.extend_from_slice(private_secret);

    Ok(STANDARD.encode(buffer))
}

/// Unpack a presented token into its identity prefix and secret bytes.
///
/// Fails on invalid base64 and on buffers too short to hold the two
/// identifiers. Everything after the 32-byte prefix is the private secret;
/// any non-negative length is tolerated here, since a wrong length simply
/// produces a hash mismatch during verification.
pub fn decode(token: &str) -> Result<DecodedToken, TokenError> {
    let bytes = STANDARD
        .decode(token)
        .map_err(|e| TokenError::DecodeFailed(e.to_string()))?;

    if bytes.len() < IDENTITY_PREFIX_LEN {
        return Err(TokenError::TooShort {
            len: bytes.len(),
            min: IDENTITY_PREFIX_LEN,
        });
    }

    let owner_user_id = Uuid::from_slice(&bytes[..16])
        .map_err(|e| TokenError::DecodeFailed(e.to_string()))?;
    let credential_id = Uuid::from_slice(&bytes[16..IDENTITY_PREFIX_LEN])
        .map_err(|e| TokenError::DecodeFailed(e.to_string()))?;

    Ok(DecodedToken {
        owner_user_id,
        credential_id,
        private_secret: bytes[IDENTITY_PREFIX_LEN..].to_vec(),
    })
}
