//! # rebalance-engine
//!
//! Waterfall fund rebalancing with per-transfer operational fees.
//!
//! Given accounts holding surplus funds (closing accounts) and accounts
//! owed money (recipient accounts), this engine plans the transfers that
//! clear every recipient's credit and charges a flat fee per transfer
//! against the surplus left over.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: accounts, transfers, balance totals
//! - **allocation** — Waterfall allocation, fee deduction, rebalance orchestration
//! - **simulation** — Random scenario generation for stress testing

pub mod allocation;
pub mod core;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::allocation::fee::FeeSchedule;
    pub use crate::allocation::rebalance::{
        rebalance, FundsCheck, RebalanceEngine, RebalanceError, RebalanceResult,
    };
    pub use crate::core::account::{AccountId, ClosingAccount, RecipientAccount};
    pub use crate::core::transfer::Transfer;
}
