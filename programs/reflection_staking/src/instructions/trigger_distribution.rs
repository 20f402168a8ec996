//! Distribution instruction handler.
//!
//! Pays the trigger bounty, swaps the remaining reward custody into the
//! stake asset and reflects the purchase onto every participant.
//!
//! ## Security Guarantees
//! - Swap output is measured from the vault, never taken from the router
//! - Output below 80% of the input (1:1 nominal) aborts the instruction
//! - Bounty only reaches a token account owned by the caller
//! - Same exclusive pool flag as deposit and withdraw

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::DistributionCompleted;
use crate::math::{
    balance_delta, check_distributable, minimum_swap_output, trigger_bounty, verify_swap,
};
use crate::router::{self, SwapExactInArgs};
use crate::state::{StakeLedger, StakePool};

/// Accounts required for triggering a distribution.
///
/// Route accounts expected by the router follow as remaining accounts,
/// in the router's own order. The stake pool PDA and both vaults must be
/// among them wherever the router expects the swap authority, source and
/// destination.
#[derive(Accounts)]
pub struct TriggerDistribution<'info> {
    /// Anyone may trigger; the bounty is paid to this signer.
    pub caller: Signer<'info>,

    /// The stake pool.
    #[account(
        mut,
        seeds = [STAKE_POOL_SEED, stake_pool.stake_mint.as_ref()],
        bump = stake_pool.bump,
        has_one = stake_vault @ StakingError::VaultMismatch,
        has_one = stake_mint @ StakingError::MintMismatch,
        has_one = reward_mint @ StakingError::MintMismatch,
        has_one = stake_ledger @ StakingError::LedgerMismatch,
        has_one = swap_program @ StakingError::InvalidSwapProgram
    )]
    pub stake_pool: Box<Account<'info, StakePool>>,

    /// The ledger receiving the reflected units.
    #[account(
        mut,
        seeds = [STAKE_LEDGER_SEED, stake_pool.key().as_ref()],
        bump = stake_ledger.bump
    )]
    pub stake_ledger: Box<Account<'info, StakeLedger>>,

    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mint::token_program = reward_token_program)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Pool's stake vault, destination of the swap.
    #[account(
        mut,
        constraint = stake_vault.owner == stake_pool.key() @ StakingError::InvalidVaultOwner
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Pool's reward custody, source of bounty and swap.
    #[account(
        mut,
        associated_token::mint = reward_mint,
        associated_token::authority = stake_pool,
        associated_token::token_program = reward_token_program
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Caller's reward token account receiving the bounty.
    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = caller,
        token::token_program = reward_token_program
    )]
    pub caller_reward_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: Matched against `stake_pool.swap_program` via `has_one`.
    #[account(executable)]
    pub swap_program: UncheckedAccount<'info>,

    pub reward_token_program: Interface<'info, TokenInterface>,
}

/// Convert accumulated rewards and reflect them onto all participants.
///
/// Fails without side effects when custody is empty, when nobody is
/// staked, or when the router under-delivers.
pub fn handler<'info>(ctx: Context<'_, '_, '_, 'info, TriggerDistribution<'info>>) -> Result<()> {
    let reward_holdings = ctx.accounts.reward_vault.amount;
    check_distributable(reward_holdings, ctx.accounts.stake_ledger.total_staked)?;

    let clock = Clock::get()?;
    let pool_key = ctx.accounts.stake_pool.key();

    ctx.accounts.stake_pool.lock()?;
    ctx.accounts.stake_pool.exit(&crate::ID)?;

    let stake_mint_key = ctx.accounts.stake_pool.stake_mint;
    let seeds = &[
        STAKE_POOL_SEED,
        stake_mint_key.as_ref(),
        &[ctx.accounts.stake_pool.bump],
    ];
    let signer_seeds = &[&seeds[..]];

    // === TRIGGER BOUNTY ===

    let mut bounty_paid = 0;
    let bounty = trigger_bounty(reward_holdings, ctx.accounts.stake_pool.trigger_bounty_rate)?;
    if bounty > 0 {
        let cpi_accounts = TransferChecked {
            from: ctx.accounts.reward_vault.to_account_info(),
            mint: ctx.accounts.reward_mint.to_account_info(),
            to: ctx.accounts.caller_reward_account.to_account_info(),
            authority: ctx.accounts.stake_pool.to_account_info(),
        };
        let cpi_program = ctx.accounts.reward_token_program.to_account_info();
        let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
        token_interface::transfer_checked(cpi_ctx, bounty, ctx.accounts.reward_mint.decimals)?;

        ctx.accounts.reward_vault.reload()?;
        bounty_paid = balance_delta(ctx.accounts.reward_vault.amount, reward_holdings)?;
    }

    // === REWARD CONVERSION ===

    let amount_in = ctx.accounts.reward_vault.amount;
    require!(amount_in > 0, StakingError::NoRewardsAvailable);

    let minimum_amount_out = minimum_swap_output(amount_in)?;
    let deadline = clock
        .unix_timestamp
        .checked_add(SWAP_DEADLINE_SECONDS)
        .ok_or(StakingError::MathOverflow)?;
    let args = SwapExactInArgs {
        amount_in,
        minimum_amount_out,
        deadline,
        path: ctx.accounts.stake_pool.swap_path(),
    };

    let stake_before = ctx.accounts.stake_vault.amount;

    router::swap_exact_in(
        &ctx.accounts.swap_program.to_account_info(),
        &pool_key,
        ctx.remaining_accounts,
        &args,
        signer_seeds,
    )?;

    ctx.accounts.reward_vault.reload()?;
    ctx.accounts.stake_vault.reload()?;

    // The deadline is enforced by the router; the clock cannot advance
    // within this transaction.
    let purchased = verify_swap(
        amount_in,
        ctx.accounts.reward_vault.amount,
        stake_before,
        ctx.accounts.stake_vault.amount,
    )?;

    // === REFLECTION ===

    let stake_ledger = &mut ctx.accounts.stake_ledger;
    let allocation = stake_ledger.distribute_proportionally(purchased)?;
    let participants = stake_ledger.participant_count() as u64;

    let stake_pool = &mut ctx.accounts.stake_pool;
    stake_pool.record_distribution(purchased, bounty_paid, clock.unix_timestamp)?;
    stake_pool.unlock();

    emit!(DistributionCompleted {
        pool: pool_key,
        caller: ctx.accounts.caller.key(),
        distributed: purchased,
        bounty: bounty_paid,
        reward_swapped: amount_in,
        participants,
        timestamp: clock.unix_timestamp,
    });

    msg!("Bounty of {} paid to {}", bounty_paid, ctx.accounts.caller.key());
    msg!("Swapped {} reward tokens into {} stake tokens", amount_in, purchased);
    msg!(
        "Reflected {} across {} participants, {} dust carried",
        allocation.allocated,
        participants,
        allocation.carried_dust
    );
    msg!("Total staked: {}", stake_ledger.total_staked);

    Ok(())
}
