//! Cryptographic primitives for envpush.
//!
//! This module provides:
//! - Per-value AES-256-GCM envelope encryption (`envelope`)
//! - CLI bearer token generation, hashing, and verification (`token`)

pub mod envelope;
pub mod token;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, MasterKey, ...};
pub use envelope::{decrypt, encrypt, MasterKey};
pub use token::{generate_raw_token, hash_token, verify_token, TOKEN_PREFIX};
