//! Error types for the Tradepost auth subsystem.
//!
//! Every message here is safe to return to a client: no secrets, no
//! tokens, no backtraces.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TradepostError {
    /// Covers both "does not exist" and "exists but outside the
    /// caller's tenant scope". The two are deliberately
    /// indistinguishable.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TradepostError {
    /// HTTP status hint for transport layers.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::AlreadyExists { .. } => 409,
            Self::AuthenticationFailed { .. } => 401,
            Self::AuthorizationDenied { .. } => 403,
            Self::Validation { .. } => 422,
            Self::Store(_) | Self::Crypto(_) | Self::Internal(_) => 500,
        }
    }
}

pub type TradepostResult<T> = Result<T, TradepostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_hints() {
        let not_found = TradepostError::NotFound {
            entity: "work_order".into(),
            id: "42".into(),
        };
        assert_eq!(not_found.status_code(), 404);

        let conflict = TradepostError::AlreadyExists {
            entity: "identity".into(),
        };
        assert_eq!(conflict.status_code(), 409);

        let unauthenticated = TradepostError::AuthenticationFailed {
            reason: "invalid credentials".into(),
        };
        assert_eq!(unauthenticated.status_code(), 401);

        let forbidden = TradepostError::AuthorizationDenied {
            reason: "forbidden".into(),
        };
        assert_eq!(forbidden.status_code(), 403);
    }

    #[test]
    fn messages_stay_generic() {
        let err = TradepostError::AuthenticationFailed {
            reason: "invalid credentials".into(),
        };
        assert_eq!(err.to_string(), "Authentication failed: invalid credentials");
    }
}
