/// Admin instruction handlers.
///
/// Handles admin-only operations for the staking pool.
///
/// ## Security Guarantees
/// - All admin functions require signer == pool.authority
/// - PDA validation ensures correct pool
/// - Rate bounds checked before storage

use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::{AuthorityTransferred, PoolConfigUpdated};
use crate::state::StakePool;

/// Accounts required for admin operations.
///
/// ## Security Notes
/// - Authority must be signer
/// - Authority must match stake_pool.authority (has_one constraint)
/// - Pool PDA validated via seeds
#[derive(Accounts)]
pub struct AdminControl<'info> {
    /// The admin authority.
    pub authority: Signer<'info>,

    /// The stake pool to modify.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, stake_pool.stake_mint.as_ref()],
        bump = stake_pool.bump,
        has_one = authority @ StakingError::Unauthorized
    )]
    pub stake_pool: Account<'info, StakePool>,
}

/// Accounts required for switching the reward asset.
#[derive(Accounts)]
pub struct SetRewardMint<'info> {
    /// The admin authority, paying for the new reward custody if needed.
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, stake_pool.stake_mint.as_ref()],
        bump = stake_pool.bump,
        has_one = authority @ StakingError::Unauthorized
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// The new reward asset.
    #[account(
        mint::token_program = reward_token_program,
        constraint = reward_mint.key() != stake_pool.stake_mint @ StakingError::MintMismatch
    )]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Reward custody for the new asset.
    #[account(
        init_if_needed,
        payer = authority,
        associated_token::mint = reward_mint,
        associated_token::authority = stake_pool,
        associated_token::token_program = reward_token_program
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub reward_token_program: Interface<'info, TokenInterface>,

    pub associated_token_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,
}

fn emit_config(stake_pool: &Account<StakePool>) {
    emit!(PoolConfigUpdated {
        pool: stake_pool.key(),
        reward_mint: stake_pool.reward_mint,
        withdraw_fee_rate: stake_pool.withdraw_fee_rate,
        trigger_bounty_rate: stake_pool.trigger_bounty_rate,
    });
}

/// Set the withdrawal burn rate.
///
/// # Arguments
/// * `ctx` - AdminControl accounts context
/// * `rate` - Parts per thousand, must be below 50 (5%)
pub fn set_withdraw_fee_handler(ctx: Context<AdminControl>, rate: u16) -> Result<()> {
    let stake_pool = &mut ctx.accounts.stake_pool;
    let clock = Clock::get()?;

    let old_rate = stake_pool.withdraw_fee_rate;
    stake_pool.set_withdraw_fee_rate(rate)?;
    stake_pool.last_updated = clock.unix_timestamp;

    emit_config(stake_pool);

    msg!("Withdraw fee updated: {} -> {} (per 1000)", old_rate, rate);
    msg!("Admin: {}", ctx.accounts.authority.key());

    Ok(())
}

/// Set the distribution trigger bounty rate.
///
/// # Arguments
/// * `ctx` - AdminControl accounts context
/// * `rate` - Parts per thousand, must be below 15 (1.5%)
pub fn set_trigger_bounty_handler(ctx: Context<AdminControl>, rate: u16) -> Result<()> {
    let stake_pool = &mut ctx.accounts.stake_pool;
    let clock = Clock::get()?;

    let old_rate = stake_pool.trigger_bounty_rate;
    stake_pool.set_trigger_bounty_rate(rate)?;
    stake_pool.last_updated = clock.unix_timestamp;

    emit_config(stake_pool);

    msg!("Trigger bounty updated: {} -> {} (per 1000)", old_rate, rate);
    msg!("Admin: {}", ctx.accounts.authority.key());

    Ok(())
}

/// Switch the reward asset.
///
/// Balances left in the previous reward custody stay there; they are only
/// distributed if the old mint is configured again.
pub fn set_reward_mint_handler(ctx: Context<SetRewardMint>) -> Result<()> {
    let stake_pool = &mut ctx.accounts.stake_pool;
    let clock = Clock::get()?;

    let old_mint = stake_pool.reward_mint;
    stake_pool.reward_mint = ctx.accounts.reward_mint.key();
    stake_pool.last_updated = clock.unix_timestamp;

    emit_config(stake_pool);

    msg!("Reward mint updated: {} -> {}", old_mint, stake_pool.reward_mint);
    msg!("Reward custody: {}", ctx.accounts.reward_vault.key());
    msg!("Admin: {}", ctx.accounts.authority.key());

    Ok(())
}

/// Transfer admin authority to a new address.
///
/// # Arguments
/// * `ctx` - AdminControl accounts context
/// * `new_authority` - New admin pubkey, must not be the default pubkey
pub fn transfer_authority_handler(
    ctx: Context<AdminControl>,
    new_authority: Pubkey,
) -> Result<()> {
    require!(
        new_authority != Pubkey::default(),
        StakingError::InvalidAuthority
    );

    let stake_pool = &mut ctx.accounts.stake_pool;
    let clock = Clock::get()?;

    let old_authority = stake_pool.authority;
    stake_pool.authority = new_authority;
    stake_pool.last_updated = clock.unix_timestamp;

    emit!(AuthorityTransferred {
        pool: stake_pool.key(),
        previous: old_authority,
        current: new_authority,
    });

    msg!("Authority transferred: {} -> {}", old_authority, new_authority);

    Ok(())
}
