//! API key issuance.

use crate::api::{ApiKeyRequest, CreatedApiKey};
use crate::error::CredentialError;
use crate::hash::HashRegistry;
use crate::model::ApiKeyCredentialModel;
use crate::secret::generate_secret;
use crate::store::{CredentialStore, StoredUser};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Hashing preferences for new credentials, standing in for the host
/// realm's password policy.
#[derive(Debug, Clone)]
pub struct IssuancePolicy {
    /// Preferred hash algorithm; `None` means whatever the registry's
    /// default is.
    pub algorithm: Option<String>,
    /// Iteration count handed to the hash provider. Must be at least 1.
    pub hash_iterations: u32,
}

impl Default for IssuancePolicy {
    fn default() -> Self {
        Self {
            algorithm: None,
            hash_iterations: 3,
        }
    }
}

/// Outcome of issuing through the username-based request surface.
#[derive(Debug)]
pub enum IssueOutcome {
    Issued(CreatedApiKey),
    /// No user with the requested name.
    UnknownUser,
    /// No hash provider resolvable; recoverable once configuration is fixed.
    NoHashProvider,
}

/// Issues API key credentials for users of the host store.
///
/// Each call persists one independent credential record; concurrent
/// issuance for the same user is safe. The raw private secret exists only
/// for the duration of the call.
pub struct ApiKeyIssuer {
    store: Arc<dyn CredentialStore>,
    registry: Arc<HashRegistry>,
    policy: IssuancePolicy,
}

impl ApiKeyIssuer {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        registry: Arc<HashRegistry>,
        policy: IssuancePolicy,
    ) -> Self {
        Self {
            store,
            registry,
            policy,
        }
    }

    /// Issue a new API key for the owner.
    ///
    /// Returns `Ok(None)` when no hash provider is resolvable: an
    /// environment misconfiguration the caller can recover from, not an
    /// error. Everything else that goes wrong is internal and propagates.
    pub fn issue(
        &self,
        owner: &StoredUser,
        expires_on: DateTime<FixedOffset>,
        additional_properties: HashMap<String, Vec<String>>,
    ) -> Result<Option<CreatedApiKey>, CredentialError> {
        let Some(hasher) = self.registry.resolve(self.policy.algorithm.as_deref()) else {
            tracing::warn!(user = %owner.id, "no password hash provider configured, key not issued");
            return Ok(None);
        };

        let secret = generate_secret();
        let secret_data = hasher.encode(&secret.encoded, self.policy.hash_iterations)?;

        let model = ApiKeyCredentialModel::create_from_generated_secret(
            hasher.algorithm(),
            secret_data.salt,
            self.policy.hash_iterations,
            secret_data.value,
            expires_on,
            additional_properties,
        )?;

        let credential_id = self
            .store
            .create_credential(owner.id, model.to_stored())?;

        let api_key = keymint_token::encode(owner.id, credential_id, &secret.raw)?;
        tracing::debug!(user = %owner.id, credential = %credential_id, "issued api key");

        Ok(Some(CreatedApiKey {
            credential_id,
            api_key,
            expires_on,
        }))
    }

    /// Issue for a user addressed by name, the request-surface flow.
    pub fn issue_for_username(
        &self,
        request: &ApiKeyRequest,
    ) -> Result<IssueOutcome, CredentialError> {
        let expires_on = request.expires_on()?;

        let Some(user) = self.store.user_by_username(&request.username)? else {
            tracing::warn!(username = %request.username, "no such user");
            return Ok(IssueOutcome::UnknownUser);
        };

        match self.issue(&user, expires_on, HashMap::new())? {
            Some(created) => Ok(IssueOutcome::Issued(created)),
            None => Ok(IssueOutcome::NoHashProvider),
        }
    }

    /// Remove a previously issued credential from the owner's set.
    pub fn remove(&self, owner: Uuid, credential_id: Uuid) -> Result<bool, CredentialError> {
        self.store.remove_credential(owner, credential_id)
    }
}
