//! Tradepost Auth: credential verification, JWT issuance/validation,
//! role guards, tenant context resolution, and secret-at-rest
//! encryption.

pub mod config;
pub mod context;
pub mod crypto;
pub mod error;
pub mod guard;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginInput, LoginOutput};
pub use token::{Claims, ValidatedClaims};
