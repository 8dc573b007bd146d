//! Domain models for the Tradepost auth subsystem.
//!
//! These are the core types shared across all crates. Domain records
//! (inventory, repairs, transactions) live outside this workspace and
//! plug in through [`crate::scope::TenantTagged`].

pub mod identity;
pub mod membership;
