//! Credential codec for the Bullana auth service.
//!
//! Three concerns live here:
//! - deterministic reversible encryption, used so encrypted email halves stay
//!   usable as exact-match query keys, and for opaque temp tokens;
//! - one-way Argon2 password hashing;
//! - RFC 6238 TOTP secret generation and verification.

pub mod cipher;
pub mod password;
pub mod totp;

pub use cipher::{CodecError, DeterministicCipher, split_email};
pub use totp::GeneratedSecret;

use sha2::{Digest, Sha256};

/// Sha-256 hex digest of `input`, for cache keys that must not contain the
/// raw value.
pub fn fingerprint(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
