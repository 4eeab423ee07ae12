//! AES-256-GCM envelope encryption for individual secret values.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! returns the envelope as a single base64 string.  `decrypt` splits the
//! nonce back out before decrypting and verifying the auth tag.
//!
//! Layout of the encoded envelope:
//!   base64( [ 12-byte nonce | ciphertext | 16-byte auth tag ] )
//!
//! Values are encrypted individually (not the whole store) so a single
//! environment's secrets can be exported or rotated independently, and
//! so the store can version per key.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::errors::{EnvPushError, Result};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// Length of the derived symmetric key (256 bits).
const KEY_LEN: usize = 32;

/// The process-wide encryption key, derived once at startup and wiped
/// from memory on drop.  Never logged, never persisted.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Environment variable the key material is read from.
    pub const ENV_VAR: &'static str = "ENVPUSH_MASTER_KEY";

    /// Derive the symmetric key from an arbitrary-length secret string.
    ///
    /// SHA-256 of the UTF-8 bytes: deterministic, one-way, fixed length.
    pub fn derive(master: &str) -> Self {
        let digest = Sha256::digest(master.as_bytes());
        Self {
            bytes: digest.into(),
        }
    }

    /// Read the master key from `ENVPUSH_MASTER_KEY`.
    pub fn from_env() -> Result<Self> {
        match std::env::var(Self::ENV_VAR) {
            Ok(raw) if !raw.is_empty() => Ok(Self::derive(&raw)),
            _ => Err(EnvPushError::MasterKeyMissing),
        }
    }

    /// Access the raw key bytes (e.g. to build the AEAD cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Encrypt a plaintext secret value under the master key.
///
/// Returns `base64(nonce || ciphertext || tag)`.  The nonce is freshly
/// random on every call, so encrypting the same value twice yields
/// different envelopes.
pub fn encrypt(plaintext: &str, key: &MasterKey) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| EnvPushError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    // The aead crate appends the 16-byte tag to the ciphertext.
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|e| EnvPushError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(envelope))
}

/// Decrypt an envelope produced by `encrypt`.
///
/// Any failure — bad encoding, truncated data, tag mismatch, or plaintext
/// that is not valid UTF-8 — is an `Integrity` error.  Partial or
/// unverified plaintext is never returned.
pub fn decrypt(envelope: &str, key: &MasterKey) -> Result<String> {
    let data = BASE64.decode(envelope).map_err(|_| EnvPushError::Integrity)?;

    // Need at least a nonce and a tag for the envelope to be well-formed.
    if data.len() < NONCE_LEN + TAG_LEN {
        return Err(EnvPushError::Integrity);
    }

    let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| EnvPushError::Integrity)?;

    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| EnvPushError::Integrity)?;

    String::from_utf8(plaintext).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        EnvPushError::Integrity
    })
}
