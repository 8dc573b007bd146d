//! Authentication error types.

use thiserror::Error;
use tradepost_core::error::TradepostError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown identifier and wrong secret both land here, with one
    /// message, so a caller cannot probe which accounts exist.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token has expired")]
    TokenExpired,

    /// Every token failure other than expiry: bad signature,
    /// structural corruption, unknown role, missing claims.
    #[error("token is malformed or invalid")]
    TokenMalformed,

    #[error("authentication required")]
    Unauthenticated,

    #[error("insufficient privileges")]
    Forbidden,

    /// Wrong key, corrupt blob, and failed integrity check are all
    /// reported identically.
    #[error("decryption failed")]
    DecryptionFailed,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for TradepostError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenMalformed
            | AuthError::Unauthenticated => TradepostError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Forbidden => TradepostError::AuthorizationDenied {
                reason: err.to_string(),
            },
            AuthError::DecryptionFailed => TradepostError::Crypto(err.to_string()),
            AuthError::Config(msg) => TradepostError::Internal(msg),
            AuthError::Crypto(msg) => TradepostError::Crypto(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_errors_map_to_401() {
        let err: TradepostError = AuthError::InvalidCredentials.into();
        assert_eq!(err.status_code(), 401);
        let err: TradepostError = AuthError::TokenExpired.into();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn forbidden_maps_to_403() {
        let err: TradepostError = AuthError::Forbidden.into();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn decryption_failure_stays_opaque() {
        assert_eq!(AuthError::DecryptionFailed.to_string(), "decryption failed");
    }
}
