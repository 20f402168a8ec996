//! State structures for the Reflection Staking program.
//!
//! This module defines all account structures used to store program state.

pub mod stake_ledger;
pub mod stake_pool;

pub use stake_ledger::*;
pub use stake_pool::*;
