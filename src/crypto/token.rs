//! CLI bearer token generation and one-way hashing.
//!
//! Raw tokens work like GitHub PATs: shown once at creation, then only
//! their SHA-256 hash is stored.  Lookup hashes the presented token and
//! compares in constant time.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Prefix identifying envpush tokens (e.g. in secret scanners).
pub const TOKEN_PREFIX: &str = "evp_";

/// Number of random bytes in a raw token (256 bits of entropy).
const TOKEN_BYTES: usize = 32;

/// Generate a new raw bearer token: `evp_` + 64 hex characters.
pub fn generate_raw_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let mut token = String::with_capacity(TOKEN_PREFIX.len() + TOKEN_BYTES * 2);
    token.push_str(TOKEN_PREFIX);
    for b in bytes {
        token.push_str(&format!("{b:02x}"));
    }
    token
}

/// Hash a raw token for storage (SHA-256, hex encoded).
///
/// Deterministic and unkeyed — the raw token itself carries the entropy.
pub fn hash_token(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    let mut hex = String::with_capacity(64);
    for b in digest {
        hex.push_str(&format!("{b:02x}"));
    }
    hex
}

/// Check a presented raw token against a stored hash in constant time.
pub fn verify_token(raw: &str, stored_hash: &str) -> bool {
    let computed = hash_token(raw);
    computed.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_token_has_prefix_and_length() {
        let token = generate_raw_token();
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(token.len(), TOKEN_PREFIX.len() + 64);
    }

    #[test]
    fn raw_tokens_are_unique() {
        assert_ne!(generate_raw_token(), generate_raw_token());
    }

    #[test]
    fn hash_is_deterministic_hex() {
        let h1 = hash_token("evp_abc");
        let h2 = hash_token("evp_abc");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert!(h1.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn verify_accepts_matching_and_rejects_other() {
        let raw = generate_raw_token();
        let hash = hash_token(&raw);
        assert!(verify_token(&raw, &hash));
        assert!(!verify_token("evp_wrong", &hash));
    }
}
