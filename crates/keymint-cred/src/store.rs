//! Host credential store abstraction.
//!
//! The core never persists anything itself; it talks to the host identity
//! server's user directory and credential storage through this trait. The
//! host store is treated as externally transactional: single create/read/
//! delete operations, no multi-step transactions spanning the core's logic.

use crate::error::CredentialError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// A user known to the host's user directory.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: Uuid,
    pub username: String,
}

/// The host's generic credential shape: scalar bookkeeping fields plus two
/// opaque JSON blobs the host never looks inside.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    /// Host-assigned id, absent until the record is created.
    pub id: Option<Uuid>,
    /// Discriminator for the credential kind, `"api-key"` for this module.
    pub credential_type: String,
    pub user_label: Option<String>,
    pub created_date: DateTime<Utc>,
    /// Serialized public metadata.
    pub credential_data: String,
    /// Serialized secret material.
    pub secret_data: String,
}

/// Access to the host's user directory and per-user credential sets.
///
/// Credential lookups are always owner-scoped: a credential id resolves only
/// within the credential set of the given owner. Implementations must be
/// safe to share across threads.
pub trait CredentialStore: Send + Sync {
    /// Persist a new credential under the owner; the host assigns the id.
    fn create_credential(
        &self,
        owner: Uuid,
        credential: StoredCredential,
    ) -> Result<Uuid, CredentialError>;

    /// Fetch a credential by id from the owner's credential set.
    fn credential_by_id(
        &self,
        owner: Uuid,
        credential_id: Uuid,
    ) -> Result<Option<StoredCredential>, CredentialError>;

    /// Remove a credential from the owner's credential set.
    fn remove_credential(&self, owner: Uuid, credential_id: Uuid)
    -> Result<bool, CredentialError>;

    fn user_by_id(&self, id: Uuid) -> Result<Option<StoredUser>, CredentialError>;

    fn user_by_username(&self, username: &str) -> Result<Option<StoredUser>, CredentialError>;
}

/// In-memory store backend.
///
/// Useful for tests and for embedding where no host store is wired up.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, StoredUser>>,
    credentials: RwLock<HashMap<(Uuid, Uuid), StoredCredential>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and return its id.
    pub fn add_user(&self, username: &str) -> Result<StoredUser, CredentialError> {
        let user = StoredUser {
            id: Uuid::new_v4(),
            username: username.to_string(),
        };
        let mut users = self
            .users
            .write()
            .map_err(|e| CredentialError::Store(format!("lock poisoned: {e}")))?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Overwrite a stored credential in place (testing/inspection).
    pub fn put_credential(
        &self,
        owner: Uuid,
        credential_id: Uuid,
        credential: StoredCredential,
    ) -> Result<(), CredentialError> {
        let mut credentials = self
            .credentials
            .write()
            .map_err(|e| CredentialError::Store(format!("lock poisoned: {e}")))?;
        credentials.insert((owner, credential_id), credential);
        Ok(())
    }

    /// Number of credentials stored for the owner (testing/inspection).
    pub fn credential_count(&self, owner: Uuid) -> Result<usize, CredentialError> {
        let credentials = self
            .credentials
            .read()
            .map_err(|e| CredentialError::Store(format!("lock poisoned: {e}")))?;
        Ok(credentials.keys().filter(|(o, _)| *o == owner).count())
    }
}

impl CredentialStore for InMemoryStore {
    fn create_credential(
        &self,
        owner: Uuid,
        mut credential: StoredCredential,
    ) -> Result<Uuid, CredentialError> {
        let id = Uuid::new_v4();
        credential.id = Some(id);
        let mut credentials = self
            .credentials
            .write()
            .map_err(|e| CredentialError::Store(format!("lock poisoned: {e}")))?;
        credentials.insert((owner, id), credential);
        Ok(id)
    }

    fn credential_by_id(
        &self,
        owner: Uuid,
        credential_id: Uuid,
    ) -> Result<Option<StoredCredential>, CredentialError> {
        let credentials = self
            .credentials
            .read()
            .map_err(|e| CredentialError::Store(format!("lock poisoned: {e}")))?;
        Ok(credentials.get(&(owner, credential_id)).cloned())
    }

    fn remove_credential(
        &self,
        owner: Uuid,
        credential_id: Uuid,
    ) -> Result<bool, CredentialError> {
        let mut credentials = self
            .credentials
            .write()
            .map_err(|e| CredentialError::Store(format!("lock poisoned: {e}")))?;
        Ok(credentials.remove(&(owner, credential_id)).is_some())
    }

    fn user_by_id(&self, id: Uuid) -> Result<Option<StoredUser>, CredentialError> {
        let users = self
            .users
            .read()
            .map_err(|e| CredentialError::Store(format!("lock poisoned: {e}")))?;
        Ok(users.get(&id).cloned())
    }

    fn user_by_username(&self, username: &str) -> Result<Option<StoredUser>, CredentialError> {
        let users = self
            .users
            .read()
            .map_err(|e| CredentialError::Store(format!("lock poisoned: {e}")))?;
        Ok(users.values().find(|u| u.username == username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_credential() -> StoredCredential {
        StoredCredential {
            id: None,
            credential_type: "api-key".to_string(),
            user_label: None,
            created_date: Utc::now(),
            credential_data: "{}".to_string(),
            secret_data: "{}".to_string(),
        }
    }

    #[test]
    fn test_create_assigns_id() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();

        let id = store.create_credential(owner, sample_credential()).unwrap();
        let fetched = store.credential_by_id(owner, id).unwrap().unwrap();
        assert_eq!(fetched.id, Some(id));
    }

    #[test]
    fn test_lookup_is_owner_scoped() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let id = store.create_credential(owner, sample_credential()).unwrap();
        assert!(store.credential_by_id(other, id).unwrap().is_none());
        assert!(store.credential_by_id(owner, id).unwrap().is_some());
    }

    #[test]
    fn test_remove_credential() {
        let store = InMemoryStore::new();
        let owner = Uuid::new_v4();

        let id = store.create_credential(owner, sample_credential()).unwrap();
        assert_eq!(store.credential_count(owner).unwrap(), 1);
        assert!(store.remove_credential(owner, id).unwrap());
        assert!(!store.remove_credential(owner, id).unwrap());
        assert!(store.credential_by_id(owner, id).unwrap().is_none());
        assert_eq!(store.credential_count(owner).unwrap(), 0);
    }

    #[test]
    fn test_user_lookup_by_id_and_name() {
        let store = InMemoryStore::new();
        let user = store.add_user("alice").unwrap();

        assert_eq!(store.user_by_id(user.id).unwrap().unwrap().username, "alice");
        assert_eq!(store.user_by_username("alice").unwrap().unwrap().id, user.id);
        assert!(store.user_by_username("bob").unwrap().is_none());
    }
}
