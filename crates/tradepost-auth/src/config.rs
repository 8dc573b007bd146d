//! Authentication configuration.

use crate::error::AuthError;

/// Compiled-in development fallback for the token signing secret.
/// Selecting it while `TRADEPOST_ENV=production` is a startup error.
const DEV_TOKEN_SECRET: &str = "tradepost-dev-secret-do-not-deploy";

/// Password strength rules applied at account creation and password
/// change. Login never applies them, so accounts predating a policy
/// tightening can still sign in.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 12,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_symbol: true,
        }
    }
}

/// Configuration for the authentication service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT issuer (`iss` claim), stamped on issue and required on
    /// verification.
    pub token_issuer: String,
    /// Symmetric secret for HS256 token signing.
    pub token_secret: String,
    /// Access token lifetime in seconds (default: 86_400 = 24 hours).
    pub token_lifetime_secs: u64,
    /// Application salt for the client-side digest login path.
    /// `None` means digest-shaped secrets can never match.
    pub client_digest_salt: Option<String>,
    /// 256-bit AES-GCM key for encrypting third-party credentials at
    /// rest. `None` disables the encryptor.
    pub at_rest_key: Option<[u8; 32]>,
    /// Password strength rules.
    pub password_policy: PasswordPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_issuer: "tradepost".into(),
            token_secret: DEV_TOKEN_SECRET.into(),
            token_lifetime_secs: 86_400,
            client_digest_salt: None,
            at_rest_key: None,
            password_policy: PasswordPolicy::default(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from `TRADEPOST_*` environment variables.
    ///
    /// Unset values fall back to defaults, except the signing secret:
    /// in production the development fallback is refused and startup
    /// fails.
    pub fn from_env() -> Result<Self, AuthError> {
        let production = std::env::var("TRADEPOST_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let token_secret =
            resolve_token_secret(std::env::var("TRADEPOST_TOKEN_SECRET").ok(), production)?;

        let token_lifetime_secs = std::env::var("TRADEPOST_TOKEN_LIFETIME_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let at_rest_key = match std::env::var("TRADEPOST_AT_REST_KEY") {
            Ok(encoded) => Some(decode_at_rest_key(&encoded)?),
            Err(_) => None,
        };

        Ok(Self {
            token_issuer: std::env::var("TRADEPOST_TOKEN_ISSUER")
                .unwrap_or_else(|_| "tradepost".into()),
            token_secret,
            token_lifetime_secs,
            client_digest_salt: std::env::var("TRADEPOST_CLIENT_DIGEST_SALT").ok(),
            at_rest_key,
            password_policy: PasswordPolicy::default(),
        })
    }
}

/// Pick the effective signing secret.
///
/// A configured non-empty secret always wins. Otherwise development
/// gets the compiled-in fallback and production gets a hard error.
pub fn resolve_token_secret(
    configured: Option<String>,
    production: bool,
) -> Result<String, AuthError> {
    match configured {
        Some(secret) if !secret.is_empty() => Ok(secret),
        _ if production => Err(AuthError::Config(
            "TRADEPOST_TOKEN_SECRET must be set in production".into(),
        )),
        _ => Ok(DEV_TOKEN_SECRET.into()),
    }
}

/// Decode a 64-hex-character environment value into a 32-byte key.
fn decode_at_rest_key(encoded: &str) -> Result<[u8; 32], AuthError> {
    let bytes = hex::decode(encoded.trim())
        .map_err(|_| AuthError::Config("TRADEPOST_AT_REST_KEY is not valid hex".into()))?;
    bytes
        .try_into()
        .map_err(|_| AuthError::Config("TRADEPOST_AT_REST_KEY must decode to 32 bytes".into()))
}
