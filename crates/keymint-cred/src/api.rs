//! Request and response surface types for issuance.
//!
//! Plain serde DTOs; transport wiring (HTTP or otherwise) lives with the
//! host, not here.

use crate::error::CredentialError;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A request to issue an API key for a named user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequest {
    pub username: String,
    /// Expiry as an ISO-8601 timestamp with offset.
    pub expires_on: String,
}

impl ApiKeyRequest {
    /// Parse the expiry field.
    pub fn expires_on(&self) -> Result<DateTime<FixedOffset>, CredentialError> {
        DateTime::parse_from_rfc3339(&self.expires_on)
            .map_err(|e| CredentialError::InvalidRequest(format!("expiresOn: {e}")))
    }
}

/// The result of a successful issuance, shown to the caller exactly once.
///
/// The private secret inside `api_key` cannot be recovered from stored
/// state; only its hash is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedApiKey {
    pub credential_id: Uuid,
    /// The presentable base64 token.
    pub api_key: String,
    pub expires_on: DateTime<FixedOffset>,
}
