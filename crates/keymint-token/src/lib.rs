//! # keymint-token
//!
//! API key token wire format for Keymint.
//!
//! A token packs the owner's user id, the credential id, and the private
//! secret into a single fixed-layout byte buffer:
//!
//! ```text
//! [ owner user id: 16 bytes ][ credential id: 16 bytes ][ private secret: N bytes ]
//! ```
//!
//! Both identifiers are written as big-endian UUIDs (most significant 64-bit
//! half first), and the whole buffer is presented to holders as standard
//! base64. The token is self-describing: verification recovers both
//! identifiers from the token itself, so the server keeps no index of issued
//! keys beyond the owner's own credential list.
//!
//! Holders treat the token as opaque. Possession equals authentication, so
//! tokens must only travel over confidentiality-protecting channels.

pub mod codec;
pub mod error;

pub use codec::{DecodedToken, IDENTITY_PREFIX_LEN, decode, encode};
pub use error::TokenError;
