//! Events emitted by the Reflection Staking program.

use anchor_lang::prelude::*;

#[event]
pub struct StakeDeposited {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub requested: u64,
    /// Units that actually reached custody after any transfer fee.
    pub credited: u64,
    pub total_staked: u64,
}

#[event]
pub struct StakeWithdrawn {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub burned: u64,
    pub paid_out: u64,
    pub total_staked: u64,
}

/// A reward conversion was spread over all participants.
#[event]
pub struct DistributionCompleted {
    pub pool: Pubkey,
    pub caller: Pubkey,
    /// Stake units bought by the swap.
    pub distributed: u64,
    pub bounty: u64,
    pub reward_swapped: u64,
    pub participants: u64,
    pub timestamp: i64,
}

#[event]
pub struct PoolConfigUpdated {
    pub pool: Pubkey,
    pub reward_mint: Pubkey,
    pub withdraw_fee_rate: u16,
    pub trigger_bounty_rate: u16,
}

#[event]
pub struct AuthorityTransferred {
    pub pool: Pubkey,
    pub previous: Pubkey,
    pub current: Pubkey,
}
