//! Password hashing and verification.
//!
//! Two credential forms are supported, routed by the shape of the
//! submitted secret:
//!
//! 1. Plaintext passwords, hashed with Argon2id using
//!    OWASP-recommended parameters (memory: 19 MiB, iterations: 2,
//!    parallelism: 1) and a per-hash random salt.
//! 2. Legacy client-side digests: hex SHA-256 of the application salt
//!    followed by the password, computed by older clients before
//!    transmission and compared in constant time against the stored
//!    copy.

use std::sync::OnceLock;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::config::PasswordPolicy;
use crate::error::AuthError;

/// Hash a plaintext password with Argon2id.
///
/// The salt is randomly generated for each call, so hashing the same
/// password twice yields different PHC strings.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| AuthError::Crypto(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Crypto(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against an Argon2id PHC-format hash.
///
/// Returns `Ok(true)` on match, `Ok(false)` on mismatch, or
/// `Err(AuthError::Crypto)` if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

    let argon2 = Argon2::default();
    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}

/// Whether a submitted secret looks like a client-side digest rather
/// than a plaintext password: exactly 64 ASCII hex characters.
pub fn is_digest_shaped(secret: &str) -> bool {
    secret.len() == 64 && secret.bytes().all(|b| b.is_ascii_hexdigit())
}

/// The digest legacy clients compute before sending: hex SHA-256 of
/// the application salt followed by the password.
pub fn legacy_digest(app_salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(app_salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time comparison of a submitted digest against the stored
/// one. Exact equality: hex case is not normalized.
pub fn digest_matches(supplied: &str, stored: &str) -> bool {
    bool::from(supplied.as_bytes().ct_eq(stored.as_bytes()))
}

static EQUALIZATION_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Stand-in digest for equalizing digest-shaped attempts. Never a
/// stored credential.
const EQUALIZATION_DIGEST: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Burn a verification costing what a real account would have paid.
///
/// Called when the identifier is unknown so that the response time
/// matches a wrong-secret attempt against a real account. The cost
/// follows the secret's shape: a digest-shaped secret gets the
/// constant-time digest compare, everything else the Argon2id
/// verifier. Equalizing a digest-shaped attempt with the slow hash
/// would itself reveal that the account does not exist.
pub fn equalize_verification(secret: &str) {
    if is_digest_shaped(secret) {
        let _ = digest_matches(secret, EQUALIZATION_DIGEST);
        return;
    }
    let dummy = EQUALIZATION_HASH.get_or_init(|| hash_password("tradepost-equalization-dummy").ok());
    if let Some(hash) = dummy {
        let _ = verify_password(secret, hash);
    }
}

/// Check a candidate password against the policy.
///
/// Returns every violation, not just the first, so clients can show
/// the full list. Empty means the password is acceptable.
pub fn validate_against_policy(password: &str, policy: &PasswordPolicy) -> Vec<String> {
    let mut violations = Vec::new();

    if password.chars().count() < policy.min_length {
        violations.push(format!(
            "password must be at least {} characters",
            policy.min_length
        ));
    }
    if policy.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
        violations.push("password must contain an uppercase letter".into());
    }
    if policy.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
        violations.push("password must contain a lowercase letter".into());
    }
    if policy.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push("password must contain a digit".into());
    }
    if policy.require_symbol && !password.chars().any(|c| !c.is_alphanumeric()) {
        violations.push("password must contain a symbol".into());
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_matches() {
        let hash = hash_password("hunter2-is-not-enough").unwrap();
        assert!(verify_password("hunter2-is-not-enough", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hash_password("hunter2-is-not-enough").unwrap();
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let h1 = hash_password("same-password").unwrap();
        let h2 = hash_password("same-password").unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn malformed_hash_returns_error() {
        assert!(verify_password("pw", "not-a-hash").is_err());
    }

    #[test]
    fn digest_shape_detection() {
        assert!(is_digest_shaped(&"a1".repeat(32)));
        assert!(is_digest_shaped(&"A1".repeat(32)));
        // 63 chars
        assert!(!is_digest_shaped(&"a".repeat(63)));
        // right length, not hex
        assert!(!is_digest_shaped(&"g".repeat(64)));
        assert!(!is_digest_shaped("plain password"));
    }

    #[test]
    fn legacy_digest_is_deterministic() {
        let d1 = legacy_digest("app-salt", "secret");
        let d2 = legacy_digest("app-salt", "secret");
        assert_eq!(d1, d2);
        assert_eq!(d1.len(), 64);
        assert!(is_digest_shaped(&d1));
    }

    #[test]
    fn legacy_digest_depends_on_salt() {
        assert_ne!(
            legacy_digest("salt-a", "secret"),
            legacy_digest("salt-b", "secret")
        );
    }

    #[test]
    fn digest_comparison_is_exact() {
        let digest = legacy_digest("salt", "secret");
        assert!(digest_matches(&digest, &digest));
        // A case-shifted digest is a different string.
        assert!(!digest_matches(&digest.to_uppercase(), &digest));
        assert!(!digest_matches(&"0".repeat(64), &digest));
    }

    #[test]
    fn equalization_does_not_panic() {
        equalize_verification("anything");
        equalize_verification(&"a1".repeat(32));
    }

    #[test]
    fn equalization_cost_follows_the_secret_shape() {
        // Initialize the throwaway hash outside the measurement.
        equalize_verification("plaintext-warmup");

        // Anchor: one Argon2id computation on this machine.
        let anchor_start = std::time::Instant::now();
        let _ = hash_password("timing-anchor").unwrap();
        let anchor = anchor_start.elapsed();

        // Digest-shaped equalization must cost a digest compare, not
        // an Argon2id verification.
        let digest = "a1".repeat(32);
        let mut quickest = std::time::Duration::MAX;
        for _ in 0..3 {
            let start = std::time::Instant::now();
            equalize_verification(&digest);
            quickest = quickest.min(start.elapsed());
        }

        assert!(
            quickest < anchor / 2,
            "digest-shaped equalization took {quickest:?}, Argon2id anchor {anchor:?}"
        );
    }

    #[test]
    fn policy_reports_all_violations() {
        let policy = PasswordPolicy::default();
        let violations = validate_against_policy("short", &policy);
        assert_eq!(violations.len(), 4); // length, uppercase, digit, symbol
    }

    #[test]
    fn policy_accepts_strong_password() {
        let policy = PasswordPolicy::default();
        assert!(validate_against_policy("Str0ng-enough-pw!", &policy).is_empty());
    }

    #[test]
    fn policy_flags_missing_symbol() {
        let policy = PasswordPolicy::default();
        let violations = validate_against_policy("Str0ngenoughpw1", &policy);
        assert_eq!(violations, vec!["password must contain a symbol".to_string()]);
    }
}
