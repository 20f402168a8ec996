/// Initialize instruction handler.
///
/// Creates the stake pool, its ledger and its stake vault.
///
/// ## Security Guarantees
/// - Vault is a PDA owned by the stake pool
/// - Stake mint is locked to pool state permanently
/// - Fee and bounty rates validated before storage

use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::PoolConfigUpdated;
use crate::state::{StakeLedger, StakePool};

/// Accounts required for pool initialization.
///
/// ## Security Notes
/// - `stake_vault` is a PDA with `stake_pool` as authority
/// - One pool per stake mint, enforced by the pool seeds
/// - Reward custody is the pool's associated token account
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The admin authority that will control the pool.
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The stake pool account to be created.
    #[account(
        init,
        payer = authority,
        space = StakePool::LEN,
        seeds = [STAKE_POOL_SEED, stake_mint.key().as_ref()],
        bump
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// The ledger, created empty and grown one entry per participant.
    #[account(
        init,
        payer = authority,
        space = StakeLedger::space(0),
        seeds = [STAKE_LEDGER_SEED, stake_pool.key().as_ref()],
        bump
    )]
    pub stake_ledger: Box<Account<'info, StakeLedger>>,

    /// The stake asset mint (fixed for the pool's lifetime).
    #[account(mint::token_program = stake_token_program)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// The initial reward asset mint.
    #[account(mint::token_program = reward_token_program)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Custody of staked tokens.
    #[account(
        init,
        payer = authority,
        seeds = [STAKE_VAULT_SEED, stake_pool.key().as_ref()],
        bump,
        token::mint = stake_mint,
        token::authority = stake_pool,
        token::token_program = stake_token_program
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Custody of reward tokens awaiting distribution.
    #[account(
        init_if_needed,
        payer = authority,
        associated_token::mint = reward_mint,
        associated_token::authority = stake_pool,
        associated_token::token_program = reward_token_program
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub stake_token_program: Interface<'info, TokenInterface>,

    pub reward_token_program: Interface<'info, TokenInterface>,

    pub associated_token_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,
}

/// Initialize a new staking pool.
///
/// # Arguments
/// * `ctx` - Initialize accounts context
/// * `withdraw_fee_rate` - Burn rate on withdrawal (parts per thousand, < 50)
/// * `trigger_bounty_rate` - Distribution bounty (parts per thousand, < 15)
/// * `intermediate_mint` - Hop asset for the reward swap route
/// * `swap_program` - Router program used for reward conversion
pub fn handler(
    ctx: Context<Initialize>,
    withdraw_fee_rate: u16,
    trigger_bounty_rate: u16,
    intermediate_mint: Pubkey,
    swap_program: Pubkey,
) -> Result<()> {
    require!(
        ctx.accounts.stake_mint.key() != ctx.accounts.reward_mint.key(),
        StakingError::MintMismatch
    );

    let clock = Clock::get()?;
    let pool_key = ctx.accounts.stake_pool.key();

    let stake_pool = &mut ctx.accounts.stake_pool;
    stake_pool.set_withdraw_fee_rate(withdraw_fee_rate)?;
    stake_pool.set_trigger_bounty_rate(trigger_bounty_rate)?;

    stake_pool.authority = ctx.accounts.authority.key();
    stake_pool.stake_mint = ctx.accounts.stake_mint.key();
    stake_pool.reward_mint = ctx.accounts.reward_mint.key();
    stake_pool.intermediate_mint = intermediate_mint;
    stake_pool.swap_program = swap_program;
    stake_pool.stake_vault = ctx.accounts.stake_vault.key();
    stake_pool.stake_ledger = ctx.accounts.stake_ledger.key();
    stake_pool.total_distributed = 0;
    stake_pool.total_burned = 0;
    stake_pool.total_bounties_paid = 0;
    stake_pool.distribution_count = 0;
    stake_pool.locked = false;
    stake_pool.created_at = clock.unix_timestamp;
    stake_pool.last_updated = clock.unix_timestamp;

    stake_pool.bump = ctx.bumps.stake_pool;
    stake_pool.vault_bump = ctx.bumps.stake_vault;
    stake_pool.ledger_bump = ctx.bumps.stake_ledger;

    let stake_ledger = &mut ctx.accounts.stake_ledger;
    stake_ledger.pool = pool_key;
    stake_ledger.total_staked = 0;
    stake_ledger.undistributed_dust = 0;
    stake_ledger.bump = ctx.bumps.stake_ledger;
    stake_ledger.entries = Vec::new();

    emit!(PoolConfigUpdated {
        pool: pool_key,
        reward_mint: stake_pool.reward_mint,
        withdraw_fee_rate,
        trigger_bounty_rate,
    });

    msg!("Reflection staking pool initialized");
    msg!("Admin: {}", stake_pool.authority);
    msg!("Stake mint: {}", stake_pool.stake_mint);
    msg!("Reward mint: {}", stake_pool.reward_mint);
    msg!("Swap route: {:?}", stake_pool.swap_path());
    msg!(
        "Withdraw fee: {}/1000, trigger bounty: {}/1000",
        withdraw_fee_rate,
        trigger_bounty_rate
    );

    Ok(())
}
