//! In-memory store implementations for the Tradepost auth subsystem.
//!
//! Implements the repository traits from `tradepost-core` with
//! mutex-held collections. Used by tests and the demo composition
//! root; a persistent backend would implement the same traits.

pub mod identity;
pub mod membership;
pub mod records;

pub use identity::MemoryIdentityRepository;
pub use membership::MemoryMembershipRepository;
pub use records::{Keyed, ScopedRecords};
