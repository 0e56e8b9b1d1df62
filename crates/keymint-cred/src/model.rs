//! The two-part API key credential record and its stored projections.

use crate::error::CredentialError;
use crate::store::StoredCredential;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Storage discriminator for API key credentials.
pub const CREDENTIAL_TYPE: &str = "api-key";

/// Public metadata half of a stored API key credential.
///
/// Immutable once constructed. Serialized as one of the two opaque JSON
/// blobs the host store keeps per credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyCredentialData {
    /// Name of the hash algorithm that produced the secret hash.
    pub hash_algorithm: String,
    /// Iteration count handed to the hash provider. Always at least 1.
    pub hash_iterations: u32,
    /// Expiry timestamp, ISO-8601 with offset on the wire.
    pub expires_on: DateTime<FixedOffset>,
    /// Free-form attribute/values pairs attached at issuance.
    #[serde(default)]
    pub additional_properties: HashMap<String, Vec<String>>,
}

/// Secret half of a stored API key credential: the encoded hash of the
/// private secret and the salt the hash provider used.
///
/// Opaque to everything except the hash provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretData {
    /// Encoded hash of the base64 pre-hash secret.
    pub value: String,
    /// Salt consumed by the hash provider, base64 on the wire.
    #[serde(with = "base64_bytes")]
    pub salt: Vec<u8>,
}

/// Projection of an API key credential into the host's generic hashed
/// password shape, so a hash provider can verify a secret without knowing
/// anything about API keys.
#[derive(Debug, Clone)]
pub struct PasswordProjection {
    pub algorithm: String,
    pub salt: Vec<u8>,
    pub iterations: u32,
    pub additional_properties: HashMap<String, Vec<String>>,
    pub hash: String,
}

/// An API key credential record: one [`ApiKeyCredentialData`] and one
/// [`SecretData`], plus the host-assigned bookkeeping fields.
///
/// Constructed in memory by the issuer, written to the host store as two
/// JSON blobs, and read back into this shape on every verification. Both
/// JSON forms are produced eagerly at construction, so serialization
/// failures surface where the record is built, not where it is persisted.
#[derive(Debug, Clone)]
pub struct ApiKeyCredentialModel {
    id: Option<Uuid>,
    created_date: DateTime<Utc>,
    user_label: Option<String>,
    credential_data: ApiKeyCredentialData,
    secret_data: SecretData,
    credential_json: String,
    secret_json: String,
}

impl ApiKeyCredentialModel {
    /// Build a record for a freshly generated and hashed secret.
    ///
    /// Rejects an iteration count of zero; every stored record carries a
    /// usable count.
    pub fn create_from_generated_secret(
        hash_algorithm: &str,
        salt: Vec<u8>,
        hash_iterations: u32,
        hashed_secret: String,
        expires_on: DateTime<FixedOffset>,
        additional_properties: HashMap<String, Vec<String>>,
    ) -> Result<Self, CredentialError> {
        if hash_iterations < 1 {
            return Err(CredentialError::InvalidRequest(
                "hashIterations must be at least 1".to_string(),
            ));
        }

        let credential_data = ApiKeyCredentialData {
            hash_algorithm: hash_algorithm.to_string(),
            hash_iterations,
            expires_on,
            additional_properties,
        };
        let secret_data = SecretData {
            value: hashed_secret,
            salt,
        };

        let credential_json = serde_json::to_string(&credential_data)
            .map_err(|e| CredentialError::Serialization(e.to_string()))?;
        let secret_json = serde_json::to_string(&secret_data)
            .map_err(|e| CredentialError::Serialization(e.to_string()))?;

        Ok(Self {
            id: None,
            created_date: Utc::now(),
            user_label: None,
            credential_data,
            secret_data,
            credential_json,
            secret_json,
        })
    }

    /// Rebuild a record from the host's stored form.
    ///
    /// A parse failure here means the stored blobs are not valid JSON for
    /// the expected shapes. That signals storage corruption, not an invalid
    /// key; callers must surface it, not swallow it.
    pub fn from_stored(stored: &StoredCredential) -> Result<Self, CredentialError> {
        let credential_data: ApiKeyCredentialData = serde_json::from_str(&stored.credential_data)
            .map_err(|e| CredentialError::Deserialization(e.to_string()))?;
        let secret_data: SecretData = serde_json::from_str(&stored.secret_data)
            .map_err(|e| CredentialError::Deserialization(e.to_string()))?;

        Ok(Self {
            id: stored.id,
            created_date: stored.created_date,
            user_label: stored.user_label.clone(),
            credential_data,
            secret_data,
            credential_json: stored.credential_data.clone(),
            secret_json: stored.secret_data.clone(),
        })
    }

    /// Project into the host's generic storage shape: scalar fields plus the
    /// two opaque JSON strings.
    pub fn to_stored(&self) -> StoredCredential {
        StoredCredential {
            id: self.id,
            credential_type: CREDENTIAL_TYPE.to_string(),
            user_label: self.user_label.clone(),
            created_date: self.created_date,
            credential_data: self.credential_json.clone(),
            secret_data: self.secret_json.clone(),
        }
    }

    /// Project into the generic hashed-password shape for the hash provider.
    pub fn to_password_projection(&self) -> PasswordProjection {
        PasswordProjection {
            algorithm: self.credential_data.hash_algorithm.clone(),
            salt: self.secret_data.salt.clone(),
            iterations: self.credential_data.hash_iterations,
            additional_properties: self.credential_data.additional_properties.clone(),
            hash: self.secret_data.value.clone(),
        }
    }

    /// Host-assigned credential id, absent until the record is persisted.
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    pub fn user_label(&self) -> Option<&str> {
        self.user_label.as_deref()
    }

    pub fn credential_data(&self) -> &ApiKeyCredentialData {
        &self.credential_data
    }

    pub fn secret_data(&self) -> &SecretData {
        &self.secret_data
    }

    pub fn expires_on(&self) -> DateTime<FixedOffset> {
        self.credential_data.expires_on
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(&encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_expiry() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2030, 6, 1, 12, 0, 0)
            .unwrap()
    }

    fn sample_model() -> ApiKeyCredentialModel {
        ApiKeyCredentialModel::create_from_generated_secret(
            "argon2id",
            vec![1, 2, 3, 4],
            3,
            "aGFzaGVk".to_string(),
            sample_expiry(),
            HashMap::from([("team".to_string(), vec!["billing".to_string()])]),
        )
        .unwrap()
    }

    #[test]
    fn test_credential_json_uses_camel_case_fields() {
        let model = sample_model();
        let stored = model.to_stored();

        let value: serde_json::Value = serde_json::from_str(&stored.credential_data).unwrap();
        assert_eq!(value["hashAlgorithm"], "argon2id");
        assert_eq!(value["hashIterations"], 3);
        assert!(value["expiresOn"].is_string());
        assert_eq!(value["additionalProperties"]["team"][0], "billing");
    }

    #[test]
    fn test_secret_json_stores_salt_as_base64() {
        let stored = sample_model().to_stored();
        let value: serde_json::Value = serde_json::from_str(&stored.secret_data).unwrap();
        assert_eq!(value["value"], "aGFzaGVk");
        assert_eq!(value["salt"], "AQIDBA==");
    }

    #[test]
    fn test_stored_roundtrip() {
        let model = sample_model();
        let stored = model.to_stored();
        assert_eq!(stored.credential_type, CREDENTIAL_TYPE);

        let restored = ApiKeyCredentialModel::from_stored(&stored).unwrap();
        assert_eq!(restored.credential_data().hash_algorithm, "argon2id");
        assert_eq!(restored.credential_data().hash_iterations, 3);
        assert_eq!(restored.expires_on(), sample_expiry());
        assert_eq!(restored.secret_data().salt, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_additional_properties_default_to_empty() {
        let json = r#"{"hashAlgorithm":"argon2id","hashIterations":1,"expiresOn":"2030-06-01T12:00:00+00:00"}"#;
        let data: ApiKeyCredentialData = serde_json::from_str(json).unwrap();
        assert!(data.additional_properties.is_empty());
    }

    #[test]
    fn test_create_rejects_zero_iterations() {
        let err = ApiKeyCredentialModel::create_from_generated_secret(
            "argon2id",
            vec![1, 2, 3, 4],
            0,
            "aGFzaGVk".to_string(),
            sample_expiry(),
            HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CredentialError::InvalidRequest(_)));
    }

    #[test]
    fn test_from_stored_rejects_corrupt_blob() {
        let mut stored = sample_model().to_stored();
        stored.credential_data = "not json".to_string();

        let err = ApiKeyCredentialModel::from_stored(&stored).unwrap_err();
        assert!(matches!(err, CredentialError::Deserialization(_)));
    }

    #[test]
    fn test_password_projection_carries_both_halves() {
        let projection = sample_model().to_password_projection();
        assert_eq!(projection.algorithm, "argon2id");
        assert_eq!(projection.iterations, 3);
        assert_eq!(projection.salt, vec![1, 2, 3, 4]);
        assert_eq!(projection.hash, "aGFzaGVk");
    }
}
