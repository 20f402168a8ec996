//! Instruction handlers for the Reflection Staking program.
//!
//! This module contains all instruction implementations.

pub mod admin;
pub mod deposit_stake;
pub mod initialize;
pub mod queries;
pub mod trigger_distribution;
pub mod withdraw_stake;

pub use admin::*;
pub use deposit_stake::*;
pub use initialize::*;
pub use queries::*;
pub use trigger_distribution::*;
pub use withdraw_stake::*;
