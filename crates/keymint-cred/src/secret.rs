//! Private secret generation.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;

/// Length in bytes of a generated private secret.
pub const SECRET_LEN: usize = 32;

/// A freshly generated private secret.
///
/// `raw` is what ends up in the token; `encoded` is the base64 pre-hash
/// input handed to the hash provider. Both are dropped once issuance
/// returns; only the hash survives in storage.
pub struct GeneratedSecret {
    pub raw: Vec<u8>,
    pub encoded: String,
}

/// Generate [`SECRET_LEN`] cryptographically random bytes.
pub fn generate_secret() -> GeneratedSecret {
    let mut raw = vec![0u8; SECRET_LEN];
    rand::rng().fill_bytes(&mut raw);
    let encoded = STANDARD.encode(&raw);
    GeneratedSecret { raw, encoded }
}
