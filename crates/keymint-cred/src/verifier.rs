//! API key verification.

use crate::error::CredentialError;
use crate::hash::HashRegistry;
use crate::model::{ApiKeyCredentialModel, CREDENTIAL_TYPE};
use crate::store::CredentialStore;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Identity recovered from an accepted API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedApiKey {
    pub credential_id: Uuid,
    pub user_id: Uuid,
}

/// Verifies presented API key tokens against the host store.
///
/// Every rejection, whatever the failed check, surfaces as the same absent
/// result; callers learn accept or reject and nothing else. Only storage
/// corruption and store failures are errors.
pub struct ApiKeyVerifier {
    store: Arc<dyn CredentialStore>,
    registry: Arc<HashRegistry>,
}

impl ApiKeyVerifier {
    pub fn new(store: Arc<dyn CredentialStore>, registry: Arc<HashRegistry>) -> Self {
        Self { store, registry }
    }

    /// Verify a presented token against the current clock.
    pub fn verify(&self, token: &str) -> Result<Option<VerifiedApiKey>, CredentialError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a presented token as of `now`.
    ///
    /// The checks run in fixed order, each short-circuiting to rejection:
    /// decode, owner lookup, owner-scoped credential lookup, type check,
    /// expiry, hash compare. The owner-scoped lookup is the tamper check: a
    /// valid credential id presented under a different owner id never
    /// resolves.
    pub fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerifiedApiKey>, CredentialError> {
        let decoded = match keymint_token::decode(token) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!(error = %e, "rejecting malformed api key token");
                return Ok(None);
            }
        };

        let Some(user) = self.store.user_by_id(decoded.owner_user_id)? else {
            return Ok(None);
        };

        let Some(stored) = self
            .store
            .credential_by_id(user.id, decoded.credential_id)?
        else {
            return Ok(None);
        };
        if stored.credential_type != CREDENTIAL_TYPE {
            return Ok(None);
        }

        // A parse failure past this point is storage corruption, not an
        // invalid key; it propagates instead of rejecting.
        let model = ApiKeyCredentialModel::from_stored(&stored)?;

        if now > model.expires_on() {
            return Ok(None);
        }

        let encoded_secret = STANDARD.encode(&decoded.private_secret);
        let Some(hasher) = self
            .registry
            .resolve(Some(model.credential_data().hash_algorithm.as_str()))
        else {
            tracing::warn!("no password hash provider available, rejecting api key");
            return Ok(None);
        };

        let projection = model.to_password_projection();
        if hasher.verify(&encoded_secret, &projection) {
            Ok(Some(VerifiedApiKey {
                credential_id: decoded.credential_id,
                user_id: user.id,
            }))
        } else {
            Ok(None)
        }
    }
}
