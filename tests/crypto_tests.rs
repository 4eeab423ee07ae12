//! Integration tests for the envpush crypto module.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use envpush::crypto::{decrypt, encrypt, generate_raw_token, hash_token, verify_token, MasterKey};
use envpush::errors::EnvPushError;

// ---------------------------------------------------------------------------
// Envelope round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = MasterKey::derive("test-master-key");

    for plaintext in [
        "postgres://localhost/mydb",
        "",
        "value with spaces and = signs",
        "ünïcodé ✓",
    ] {
        let envelope = encrypt(plaintext, &key).expect("encrypt should succeed");
        let recovered = decrypt(&envelope, &key).expect("decrypt should succeed");
        assert_eq!(recovered, plaintext);
    }
}

#[test]
fn encrypt_produces_different_envelopes_each_time() {
    let key = MasterKey::derive("nonce-freshness");

    let e1 = encrypt("SECRET=hello", &key).expect("encrypt 1");
    let e2 = encrypt("SECRET=hello", &key).expect("encrypt 2");

    // Because each call generates a new random nonce, the output must differ.
    assert_ne!(e1, e2, "two encryptions of the same plaintext must differ");
}

#[test]
fn decrypt_with_wrong_key_is_integrity_error() {
    let key = MasterKey::derive("right-key");
    let wrong = MasterKey::derive("wrong-key");

    let envelope = encrypt("TOP_SECRET=42", &key).expect("encrypt");
    let result = decrypt(&envelope, &wrong);

    assert!(matches!(result, Err(EnvPushError::Integrity)));
}

// ---------------------------------------------------------------------------
// Tamper detection
// ---------------------------------------------------------------------------

#[test]
fn any_flipped_byte_fails_verification() {
    let key = MasterKey::derive("tamper-key");
    let envelope = encrypt("DATABASE_URL=postgres://localhost", &key).expect("encrypt");

    let bytes = BASE64.decode(&envelope).expect("valid base64");

    // Flip one bit at every position: nonce, ciphertext, and tag alike
    // must all be covered by the auth check.
    for i in 0..bytes.len() {
        let mut tampered = bytes.clone();
        tampered[i] ^= 0x01;
        let reencoded = BASE64.encode(&tampered);

        let result = decrypt(&reencoded, &key);
        assert!(
            matches!(result, Err(EnvPushError::Integrity)),
            "flipping byte {i} must fail decryption"
        );
    }
}

#[test]
fn truncated_or_malformed_envelope_is_integrity_error() {
    let key = MasterKey::derive("truncation-key");

    // Too short to contain a nonce and tag.
    let short = BASE64.encode([0u8; 5]);
    assert!(matches!(decrypt(&short, &key), Err(EnvPushError::Integrity)));

    // Not base64 at all.
    assert!(matches!(
        decrypt("not//valid??base64!!", &key),
        Err(EnvPushError::Integrity)
    ));
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derived_keys_are_deterministic_per_input() {
    let a1 = MasterKey::derive("master-a");
    let a2 = MasterKey::derive("master-a");
    let b = MasterKey::derive("master-b");

    assert_eq!(a1.as_bytes(), a2.as_bytes());
    assert_ne!(a1.as_bytes(), b.as_bytes());
}

#[test]
fn envelope_from_one_key_never_opens_under_another() {
    let a = MasterKey::derive("deploy-a");
    let b = MasterKey::derive("deploy-b");

    let envelope = encrypt("shared-value", &a).unwrap();
    assert!(decrypt(&envelope, &a).is_ok());
    assert!(decrypt(&envelope, &b).is_err());
}

// ---------------------------------------------------------------------------
// Bearer tokens
// ---------------------------------------------------------------------------

#[test]
fn raw_tokens_are_prefixed_and_high_entropy() {
    let token = generate_raw_token();
    assert!(token.starts_with("evp_"));
    // 32 random bytes, hex encoded.
    assert_eq!(token.len(), 4 + 64);
    assert_ne!(token, generate_raw_token());
}

#[test]
fn token_hash_is_one_way_and_stable() {
    let raw = generate_raw_token();
    let hash = hash_token(&raw);

    assert_eq!(hash, hash_token(&raw));
    assert_eq!(hash.len(), 64);
    assert_ne!(hash, raw);

    assert!(verify_token(&raw, &hash));
    assert!(!verify_token(&generate_raw_token(), &hash));
}
