//! AES-256-GCM encryption for third-party credentials at rest, plus
//! SHA-256 fingerprints for one-way integrity checks.
//!
//! This is for values the application must read back (marketplace API
//! keys, payment gateway credentials). User passwords never go
//! through here; they are hashed, not encrypted.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::AuthError;

/// Encrypt a secret with AES-256-GCM.
///
/// A fresh random 96-bit nonce is generated per call, so encrypting
/// the same plaintext twice yields different blobs. Returns
/// `base64(nonce || ciphertext || tag)` as one opaque string.
pub fn encrypt(key: &[u8; 32], plaintext: &[u8]) -> Result<String, AuthError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let mut nonce_bytes = [0u8; 12];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| AuthError::Crypto(format!("AES-GCM encrypt: {e}")))?;

    let mut combined = nonce_bytes.to_vec();
    combined.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(combined))
}

/// Decrypt a blob produced by [`encrypt`].
///
/// Fails closed: bad base64, truncated input, a wrong key, and a
/// failed auth tag all collapse into [`AuthError::DecryptionFailed`],
/// and no partial plaintext is ever returned.
pub fn decrypt(key: &[u8; 32], encoded: &str) -> Result<Vec<u8>, AuthError> {
    let combined = STANDARD
        .decode(encoded)
        .map_err(|_| AuthError::DecryptionFailed)?;

    if combined.len() < 13 {
        return Err(AuthError::DecryptionFailed);
    }

    let (nonce_bytes, ciphertext) = combined.split_at(12);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| AuthError::DecryptionFailed)
}

/// SHA-256 fingerprint of a value, hex-encoded.
///
/// For integrity checks where the value never needs to come back;
/// deliberately a different primitive from password hashing.
pub fn fingerprint(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Constant-time check of a value against a stored fingerprint.
pub fn verify_fingerprint(data: &[u8], stored: &str) -> bool {
    let computed = fingerprint(data);
    let stored = stored.to_ascii_lowercase();
    bool::from(computed.as_bytes().ct_eq(stored.as_bytes()))
}
