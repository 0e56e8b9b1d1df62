//! # keymint-cred
//!
//! API key credential model, issuance and verification for Keymint.
//!
//! This crate provides functionality for:
//! - Modeling the two-part credential record (public metadata + hashed
//!   secret material) and its stored JSON projections
//! - Issuing API keys: generate a private secret, hash it, persist the
//!   record, hand the caller a one-time token
//! - Verifying presented tokens: decode, owner-scoped lookup, type and
//!   expiry checks, hash compare
//! - Pluggable password hashing behind a registry with a default provider
//!
//! ## Verification model
//!
//! A token carries its own identity: the owner's user id and the credential
//! id are recovered from the token itself, and the credential lookup is
//! always scoped to the claimed owner. Presenting a valid credential id
//! under a different owner id never resolves. All rejections, whichever
//! check failed, look identical to the caller.
//!
//! Issuance and verification are request-scoped, synchronous and stateless;
//! the only shared state is the host's credential store behind
//! [`store::CredentialStore`].

pub mod api;
pub mod error;
pub mod hash;
pub mod issuer;
pub mod model;
pub mod secret;
pub mod store;
pub mod verifier;

pub use api::{ApiKeyRequest, CreatedApiKey};
pub use error::CredentialError;
pub use hash::{ARGON2_ALGORITHM, Argon2Hasher, HashRegistry, PasswordHasher};
pub use issuer::{ApiKeyIssuer, IssuancePolicy, IssueOutcome};
pub use model::{
    ApiKeyCredentialData, ApiKeyCredentialModel, CREDENTIAL_TYPE, PasswordProjection, SecretData,
};
pub use secret::{GeneratedSecret, SECRET_LEN, generate_secret};
pub use store::{CredentialStore, InMemoryStore, StoredCredential, StoredUser};
pub use verifier::{ApiKeyVerifier, VerifiedApiKey};
