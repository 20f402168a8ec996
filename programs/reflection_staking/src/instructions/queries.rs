//! Read-only query handlers.
//!
//! Each returns its value through Anchor return data, readable by
//! simulation or by a calling program.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::StakingError;
use crate::state::{StakeLedger, StakePool};

/// Accounts required for ledger queries.
#[derive(Accounts)]
pub struct PoolView<'info> {
    #[account(
        seeds = [STAKE_POOL_SEED, stake_pool.stake_mint.as_ref()],
        bump = stake_pool.bump,
        has_one = stake_ledger @ StakingError::LedgerMismatch
    )]
    pub stake_pool: Account<'info, StakePool>,

    pub stake_ledger: Account<'info, StakeLedger>,
}

/// Accounts required for the reward custody query.
#[derive(Accounts)]
pub struct RewardView<'info> {
    #[account(
        seeds = [STAKE_POOL_SEED, stake_pool.stake_mint.as_ref()],
        bump = stake_pool.bump
    )]
    pub stake_pool: Account<'info, StakePool>,

    #[account(
        associated_token::mint = stake_pool.reward_mint,
        associated_token::authority = stake_pool,
        associated_token::token_program = reward_token_program
    )]
    pub reward_vault: InterfaceAccount<'info, TokenAccount>,

    pub reward_token_program: Interface<'info, TokenInterface>,
}

pub fn reward_balance_handler(ctx: Context<RewardView>) -> Result<u64> {
    Ok(ctx.accounts.reward_vault.amount)
}

pub fn participant_count_handler(ctx: Context<PoolView>) -> Result<u64> {
    Ok(ctx.accounts.stake_ledger.participant_count() as u64)
}

pub fn stake_of_handler(ctx: Context<PoolView>, owner: Pubkey) -> Result<u64> {
    Ok(ctx.accounts.stake_ledger.stake_of(&owner))
}

pub fn total_staked_handler(ctx: Context<PoolView>) -> Result<u64> {
    Ok(ctx.accounts.stake_ledger.total_staked)
}
