//! Pluggable password hashing for API key secrets.
//!
//! The core never hashes anything itself; it resolves a [`PasswordHasher`]
//! from a [`HashRegistry`] and drives it through the generic password
//! projection. A built-in Argon2id provider is registered by default.

use crate::error::CredentialError;
use crate::model::{PasswordProjection, SecretData};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use std::collections::HashMap;
use subtle::ConstantTimeEq;

/// A named hash algorithm that turns a secret into comparable
/// [`SecretData`] and verifies a secret against a stored projection.
pub trait PasswordHasher: Send + Sync {
    /// Name recorded in the credential metadata at issuance.
    fn algorithm(&self) -> &str;

    /// Hash a pre-hash secret, generating a fresh salt.
    fn encode(&self, secret: &str, iterations: u32) -> Result<SecretData, CredentialError>;

    /// Check a pre-hash secret against a stored credential projection.
    fn verify(&self, secret: &str, stored: &PasswordProjection) -> bool;
}

/// Algorithm name of the built-in provider.
pub const ARGON2_ALGORITHM: &str = "argon2id";

const SALT_LEN: usize = 16;
const OUTPUT_LEN: usize = 32;
// OWASP baseline memory cost for Argon2id.
const MEMORY_KIB: u32 = 19 * 1024;

/// Built-in Argon2id provider.
///
/// The credential's iteration count maps to the Argon2 time cost; salt and
/// output are raw bytes, stored base64 in [`SecretData`].
#[derive(Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }

    fn hash_raw(
        &self,
        secret: &str,
        salt: &[u8],
        iterations: u32,
    ) -> Result<Vec<u8>, CredentialError> {
        let params = Params::new(MEMORY_KIB, iterations, 1, Some(OUTPUT_LEN))
            .map_err(|e| CredentialError::Hash(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut output = vec![0u8; OUTPUT_LEN];
        argon2
            .hash_password_into(secret.as_bytes(), salt, &mut output)
            .map_err(|e| CredentialError::Hash(e.to_string()))?;
        Ok(output)
    }
}

impl PasswordHasher for Argon2Hasher {
    fn algorithm(&self) -> &str {
        ARGON2_ALGORITHM
    }

    fn encode(&self, secret: &str, iterations: u32) -> Result<SecretData, CredentialError> {
        let mut salt = vec![0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut salt);

        let hash = self.hash_raw(secret, &salt, iterations)?;
        Ok(SecretData {
            value: STANDARD.encode(hash),
            salt,
        })
    }

    fn verify(&self, secret: &str, stored: &PasswordProjection) -> bool {
        let Ok(expected) = STANDARD.decode(&stored.hash) else {
            return false;
        };
        let Ok(computed) = self.hash_raw(secret, &stored.salt, stored.iterations) else {
            return false;
        };
        computed.ct_eq(&expected).into()
    }
}

/// Registry of named hash providers with a default fallback.
///
/// An explicitly constructed, explicitly owned resource: the issuer and
/// verifier each hold a handle to one, there is no process-wide lookup.
#[derive(Default)]
pub struct HashRegistry {
    providers: HashMap<String, Box<dyn PasswordHasher>>,
    default: Option<String>,
}

impl HashRegistry {
    /// An empty registry with no providers and no default.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with the built-in Argon2id provider as default.
    pub fn with_defaults() -> Self {
        Self::empty().register_default(Box::new(Argon2Hasher::new()))
    }

    /// Register a provider under its algorithm name.
    pub fn register(mut self, provider: Box<dyn PasswordHasher>) -> Self {
        self.providers
            .insert(provider.algorithm().to_string(), provider);
        self
    }

    /// Register a provider and make it the default fallback.
    pub fn register_default(mut self, provider: Box<dyn PasswordHasher>) -> Self {
        let name = provider.algorithm().to_string();
        self.providers.insert(name.clone(), provider);
        self.default = Some(name);
        self
    }

    /// Resolve a provider by name, falling back to the default.
    ///
    /// A missing named algorithm is an environment misconfiguration worth
    /// flagging, but verification must not hard-fail while a default exists.
    pub fn resolve(&self, algorithm: Option<&str>) -> Option<&dyn PasswordHasher> {
        if let Some(name) = algorithm {
            if let Some(provider) = self.providers.get(name) {
                return Some(provider.as_ref());
            }
            tracing::warn!(algorithm = name, "password hash provider not found, using default");
        }

        self.default
            .as_deref()
            .and_then(|name| self.providers.get(name))
            .map(|provider| provider.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_then_verify() {
        let hasher = Argon2Hasher::new();
        let secret_data = hasher.encode("c2VjcmV0", 1).unwrap();
        assert_eq!(secret_data.salt.len(), SALT_LEN);

        let projection = PasswordProjection {
            algorithm: ARGON2_ALGORITHM.to_string(),
            salt: secret_data.salt.clone(),
            iterations: 1,
            additional_properties: HashMap::new(),
            hash: secret_data.value.clone(),
        };
        assert!(hasher.verify("c2VjcmV0", &projection));
        assert!(!hasher.verify("d3Jvbmc=", &projection));
    }

    #[test]
    fn test_verify_fails_on_wrong_iterations() {
        let hasher = Argon2Hasher::new();
        let secret_data = hasher.encode("c2VjcmV0", 1).unwrap();

        let projection = PasswordProjection {
            algorithm: ARGON2_ALGORITHM.to_string(),
            salt: secret_data.salt,
            iterations: 2,
            additional_properties: HashMap::new(),
            hash: secret_data.value,
        };
        assert!(!hasher.verify("c2VjcmV0", &projection));
    }

    #[test]
    fn test_encode_rejects_zero_iterations() {
        let err = Argon2Hasher::new().encode("c2VjcmV0", 0).unwrap_err();
        assert!(matches!(err, CredentialError::Hash(_)));
    }

    #[test]
    fn test_registry_resolves_named_provider() {
        let registry = HashRegistry::with_defaults();
        let provider = registry.resolve(Some(ARGON2_ALGORITHM)).unwrap();
        assert_eq!(provider.algorithm(), ARGON2_ALGORITHM);
    }

    #[test]
    fn test_registry_falls_back_to_default_for_unknown_name() {
        let registry = HashRegistry::with_defaults();
        let provider = registry.resolve(Some("pbkdf2-sha512")).unwrap();
        assert_eq!(provider.algorithm(), ARGON2_ALGORITHM);
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let registry = HashRegistry::empty();
        assert!(registry.resolve(None).is_none());
        assert!(registry.resolve(Some(ARGON2_ALGORITHM)).is_none());
    }
}
