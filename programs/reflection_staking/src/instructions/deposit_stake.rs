//! Deposit instruction handler.
//!
//! Moves stake tokens into pool custody and credits the amount that
//! actually arrived.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::StakeDeposited;
use crate::math::balance_delta;
use crate::state::{StakeLedger, StakePool};

/// Accounts required for depositing stake.
#[derive(Accounts)]
pub struct DepositStake<'info> {
    /// The participant depositing tokens.
    #[account(mut)]
    pub user: Signer<'info>,

    /// The stake pool.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, stake_pool.stake_mint.as_ref()],
        bump = stake_pool.bump,
        has_one = stake_vault @ StakingError::VaultMismatch,
        has_one = stake_mint @ StakingError::MintMismatch,
        has_one = stake_ledger @ StakingError::LedgerMismatch
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// The ledger, grown by one entry when `user` is a new participant.
    #[account(
        mut,
        seeds = [STAKE_LEDGER_SEED, stake_pool.key().as_ref()],
        bump = stake_ledger.bump,
        realloc = StakeLedger::space(stake_ledger.len_after_credit(&user.key())),
        realloc::payer = user,
        realloc::zero = false
    )]
    pub stake_ledger: Box<Account<'info, StakeLedger>>,

    /// The stake asset mint.
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// User's token account for the stake asset.
    #[account(
        mut,
        token::mint = stake_mint,
        token::authority = user,
        token::token_program = token_program
    )]
    pub user_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Pool's stake vault.
    #[account(
        mut,
        constraint = stake_vault.owner == stake_pool.key() @ StakingError::InvalidVaultOwner
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Deposit `amount` stake tokens into the pool.
///
/// The ledger is credited with the vault balance delta, which is smaller
/// than `amount` when the mint withholds a transfer fee.
pub fn handler(ctx: Context<DepositStake>, amount: u64) -> Result<()> {
    require!(amount > 0, StakingError::InvalidAmount);
    require!(
        ctx.accounts.user_token_account.amount > 0,
        StakingError::NoStakeAssetHeld
    );

    let clock = Clock::get()?;

    ctx.accounts.stake_pool.lock()?;
    // Persist the flag so a nested entry through a transfer hook sees it.
    ctx.accounts.stake_pool.exit(&crate::ID)?;

    let vault_before = ctx.accounts.stake_vault.amount;

    let cpi_accounts = TransferChecked {
        from: ctx.accounts.user_token_account.to_account_info(),
        mint: ctx.accounts.stake_mint.to_account_info(),
        to: ctx.accounts.stake_vault.to_account_info(),
        authority: ctx.accounts.user.to_account_info(),
    };
    let cpi_program = ctx.accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);
    token_interface::transfer_checked(cpi_ctx, amount, ctx.accounts.stake_mint.decimals)?;

    ctx.accounts.stake_vault.reload()?;
    let credited = balance_delta(vault_before, ctx.accounts.stake_vault.amount)?;

    let owner = ctx.accounts.user.key();
    let stake_ledger = &mut ctx.accounts.stake_ledger;
    stake_ledger.credit_new_stake(owner, credited)?;

    let stake_pool = &mut ctx.accounts.stake_pool;
    stake_pool.last_updated = clock.unix_timestamp;
    stake_pool.unlock();

    emit!(StakeDeposited {
        pool: stake_pool.key(),
        owner,
        requested: amount,
        credited,
        total_staked: stake_ledger.total_staked,
    });

    msg!("Deposited {} tokens, credited {}", amount, credited);
    msg!("Stake of {}: {}", owner, stake_ledger.stake_of(&owner));
    msg!(
        "Total staked: {} across {} participants",
        stake_ledger.total_staked,
        stake_ledger.participant_count()
    );

    Ok(())
}
