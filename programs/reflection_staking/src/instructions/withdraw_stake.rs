//! Withdraw instruction handler.
//!
//! Debits stake, burns the withdrawal fee and pays out the rest.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    self, Burn, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::StakeWithdrawn;
use crate::math::{check_withdrawal, split_withdrawal};
use crate::state::{StakeLedger, StakePool};

/// Accounts required for withdrawing stake.
#[derive(Accounts)]
#[instruction(amount: u64)]
pub struct WithdrawStake<'info> {
    /// The participant withdrawing tokens.
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

    /// The ledger, shrunk by one entry when `user` exits completely.
    /// The freed rent goes back to the withdrawer.
    #[account(
        mut,
        seeds = [STAKE_LEDGER_SEED, stake_pool.key().as_ref()],
        bump = stake_ledger.bump,
        realloc = StakeLedger::space(stake_ledger.len_after_debit(&user.key(), amount)),
        realloc::payer = user,
        realloc::zero = false
    )]
    pub stake_ledger: Box<Account<'info, StakeLedger>>,

    /// The stake asset mint (burn target).
    #[account(mut)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// User's token account receiving the payout.
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

/// Withdraw `amount` of the caller's stake.
///
/// The recorded stake drops by the full `amount`; `withdraw_fee_rate`
/// parts per thousand of it are burned and the rest is paid out.
/// Withdrawing the whole balance removes the caller from the ledger.
pub fn handler(ctx: Context<WithdrawStake>, amount: u64) -> Result<()> {
    let owner = ctx.accounts.user.key();
    let balance = ctx.accounts.stake_ledger.stake_of(&owner);
    check_withdrawal(balance, amount)?;

    let clock = Clock::get()?;
    let split = split_withdrawal(amount, ctx.accounts.stake_pool.withdraw_fee_rate)?;

    ctx.accounts.stake_pool.lock()?;

    // Effects before interactions: the debit is committed to account data
    // ahead of any token program call.
    let remaining = ctx.accounts.stake_ledger.debit_stake(&owner, amount)?;
    ctx.accounts.stake_pool.record_withdrawal(split.burned, clock.unix_timestamp)?;
    ctx.accounts.stake_ledger.exit(&crate::ID)?;
    ctx.accounts.stake_pool.exit(&crate::ID)?;

    let stake_mint_key = ctx.accounts.stake_pool.stake_mint;
    let seeds = &[
        STAKE_POOL_SEED,
        stake_mint_key.as_ref(),
        &[ctx.accounts.stake_pool.bump],
    ];
    let signer_seeds = &[&seeds[..]];

    if split.burned > 0 {
        let cpi_accounts = Burn {
            mint: ctx.accounts.stake_mint.to_account_info(),
            from: ctx.accounts.stake_vault.to_account_info(),
            authority: ctx.accounts.stake_pool.to_account_info(),
        };
        let cpi_program = ctx.accounts.token_program.to_account_info();
        let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
        token_interface::burn(cpi_ctx, split.burned)?;
    }

    if split.paid_out > 0 {
        let cpi_accounts = TransferChecked {
            from: ctx.accounts.stake_vault.to_account_info(),
            mint: ctx.accounts.stake_mint.to_account_info(),
            to: ctx.accounts.user_token_account.to_account_info(),
            authority: ctx.accounts.stake_pool.to_account_info(),
        };
        let cpi_program = ctx.accounts.token_program.to_account_info();
        let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
        token_interface::transfer_checked(
            cpi_ctx,
            split.paid_out,
            ctx.accounts.stake_mint.decimals,
        )?;
    }

    ctx.accounts.stake_pool.unlock();

    let total_staked = ctx.accounts.stake_ledger.total_staked;
    emit!(StakeWithdrawn {
        pool: ctx.accounts.stake_pool.key(),
        owner,
        amount,
        burned: split.burned,
        paid_out: split.paid_out,
        total_staked,
    });

    msg!("Withdrew {} tokens: burned {}, paid {}", amount, split.burned, split.paid_out);
    msg!("Remaining stake: {}", remaining);
    if remaining == 0 {
        msg!("{} left the pool", owner);
    }
    msg!("Total staked: {}", total_staked);

    Ok(())
}
