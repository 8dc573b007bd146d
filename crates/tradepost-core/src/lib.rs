//! Shared types and contracts for the Tradepost auth subsystem.

pub mod error;
pub mod models;
pub mod repository;
pub mod scope;

pub use error::{TradepostError, TradepostResult};
pub use scope::{IsolationContext, TenantTagged};
