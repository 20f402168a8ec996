//! # Reflection Staking Program
//!
//! A pooled staking program that converts externally acquired reward
//! tokens into the stake asset and reflects the purchase onto every
//! staker in proportion to their stake.
//!
//! ## Features
//! - Deposits credited by measured custody delta (fee-on-transfer safe)
//! - Withdrawal fee burned, remainder paid out
//! - Permissionless, bounty-incentivized reward distribution
//! - Swap through an external router with a fixed 80% output floor
//! - Exclusive pool flag rejecting reentrant entry
//! - Admin controls for fee, bounty and reward asset
//!
//! ## Rounding
//! Proportional shares are floored. The truncated remainder stays in the
//! stake vault and is added to the next distribution.

use anchor_lang::prelude::*;

declare_id!("Rf1ctStkP9vKq6bM3aWcN8xTz4LdH2yEoJu5sGiQ7nA");

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod math;
pub mod router;
pub mod state;

use instructions::*;

#[program]
pub mod reflection_staking {
    use super::*;

    /// Creates the pool, its ledger, its stake vault and reward custody.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for initialization
    /// * `withdraw_fee_rate` - Burn on withdrawal, parts per thousand (< 50)
    /// * `trigger_bounty_rate` - Distribution bounty, parts per thousand (< 15)
    /// * `intermediate_mint` - Hop asset for the reward swap route
    /// * `swap_program` - Router program used for reward conversion
    ///
    /// # Errors
    /// Returns an error if a rate is out of range or the mints coincide.
    pub fn initialize(
        ctx: Context<Initialize>,
        withdraw_fee_rate: u16,
        trigger_bounty_rate: u16,
        intermediate_mint: Pubkey,
        swap_program: Pubkey,
    ) -> Result<()> {
        instructions::initialize::handler(
            ctx,
            withdraw_fee_rate,
            trigger_bounty_rate,
            intermediate_mint,
            swap_program,
        )
    }

    /// Deposits stake tokens, crediting the amount that reached custody.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Amount is zero
    /// - Depositor holds no stake tokens
    /// - The participant limit is reached
    /// - The pool is already executing another operation
    pub fn deposit_stake(ctx: Context<DepositStake>, amount: u64) -> Result<()> {
        instructions::deposit_stake::handler(ctx, amount)
    }

    /// Withdraws stake, burning the withdrawal fee.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Amount is zero
    /// - Caller has nothing staked
    /// - Amount exceeds the caller's stake
    /// - The pool is already executing another operation
    pub fn withdraw_stake(ctx: Context<WithdrawStake>, amount: u64) -> Result<()> {
        instructions::withdraw_stake::handler(ctx, amount)
    }

    /// Swaps reward custody into the stake asset and reflects it onto all
    /// participants. Callable by anyone; pays the trigger bounty.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Reward custody is empty
    /// - Nothing is staked
    /// - The router returns less than 80% of the input
    /// - The swap deadline has passed
    pub fn trigger_distribution<'info>(
        ctx: Context<'_, '_, '_, 'info, TriggerDistribution<'info>>,
    ) -> Result<()> {
        instructions::trigger_distribution::handler(ctx)
    }

    /// Admin function to set the withdrawal fee (parts per thousand, < 50).
    pub fn set_withdraw_fee(ctx: Context<AdminControl>, rate: u16) -> Result<()> {
        instructions::admin::set_withdraw_fee_handler(ctx, rate)
    }

    /// Admin function to set the trigger bounty (parts per thousand, < 15).
    pub fn set_trigger_bounty(ctx: Context<AdminControl>, rate: u16) -> Result<()> {
        instructions::admin::set_trigger_bounty_handler(ctx, rate)
    }

    /// Admin function to switch the reward asset.
    pub fn set_reward_mint(ctx: Context<SetRewardMint>) -> Result<()> {
        instructions::admin::set_reward_mint_handler(ctx)
    }

    /// Admin function to transfer authority to a new address.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the current admin
    /// - New authority is the default pubkey
    pub fn transfer_authority(ctx: Context<AdminControl>, new_authority: Pubkey) -> Result<()> {
        instructions::admin::transfer_authority_handler(ctx, new_authority)
    }

    /// Current reward custody balance.
    pub fn reward_balance(ctx: Context<RewardView>) -> Result<u64> {
        instructions::queries::reward_balance_handler(ctx)
    }

    /// Number of participants with a positive stake.
    pub fn participant_count(ctx: Context<PoolView>) -> Result<u64> {
        instructions::queries::participant_count_handler(ctx)
    }

    /// Recorded stake of `owner`, zero for non-participants.
    pub fn stake_of(ctx: Context<PoolView>, owner: Pubkey) -> Result<u64> {
        instructions::queries::stake_of_handler(ctx, owner)
    }

    /// Sum of all recorded stakes.
    pub fn total_staked(ctx: Context<PoolView>) -> Result<u64> {
        instructions::queries::total_staked_handler(ctx)
    }
}
