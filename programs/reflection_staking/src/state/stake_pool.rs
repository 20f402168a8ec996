use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::math::validate_rate;

#[account]
pub struct StakePool {
    pub authority: Pubkey,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub intermediate_mint: Pubkey,
    pub swap_program: Pubkey,
    pub stake_vault: Pubkey,
    pub stake_ledger: Pubkey,

    /// Parts per thousand burned on withdrawal.
    pub withdraw_fee_rate: u16,
    /// Parts per thousand of reward custody paid to the distribution trigger.
    pub trigger_bounty_rate: u16,

    pub total_distributed: u64,
    pub total_burned: u64,
    pub total_bounties_paid: u64,
    pub distribution_count: u64,

    pub locked: bool,

    pub last_updated: i64,
    pub created_at: i64,

    pub vault_bump: u8,
    pub ledger_bump: u8,
    pub bump: u8,
}

impl StakePool {
    pub const LEN: usize = 8
        + (32 * 7)
        + (2 * 2)
        + (8 * 4)
        + 1
        + (8 * 2)
        + 3;

    pub fn set_withdraw_fee_rate(&mut self, rate: u16) -> Result<()> {
        validate_rate(rate, WITHDRAW_FEE_RATE_LIMIT)?;
        self.withdraw_fee_rate = rate;
        Ok(())
    }

    pub fn set_trigger_bounty_rate(&mut self, rate: u16) -> Result<()> {
        validate_rate(rate, TRIGGER_BOUNTY_RATE_LIMIT)?;
        self.trigger_bounty_rate = rate;
        Ok(())
    }

    /// Take the pool's exclusive execution flag.
    ///
    /// Fails immediately if another entry point already holds it. The flag
    /// is released by `unlock` on success; a failed instruction is rolled
    /// back by the runtime, which clears it as well.
    pub fn lock(&mut self) -> Result<()> {
        require!(!self.locked, StakingError::Reentrancy);
        self.locked = true;
        Ok(())
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Route for converting rewards into the stake asset.
    ///
    /// The intermediate hop is skipped when it coincides with either end.
    pub fn swap_path(&self) -> Vec<Pubkey> {
        let mut path = vec![self.reward_mint];
        if self.intermediate_mint != self.reward_mint
            && self.intermediate_mint != self.stake_mint
        {
            path.push(self.intermediate_mint);
        }
        path.push(self.stake_mint);
        path
    }

    pub fn record_withdrawal(&mut self, burned: u64, now: i64) -> Result<()> {
        self.total_burned = self
            .total_burned
            .checked_add(burned)
            .ok_or(StakingError::MathOverflow)?;
        self.last_updated = now;
        Ok(())
    }

    pub fn record_distribution(&mut self, distributed: u64, bounty: u64, now: i64) -> Result<()> {
        self.total_distributed = self
            .total_distributed
            .checked_add(distributed)
            .ok_or(StakingError::MathOverflow)?;
        self.total_bounties_paid = self
            .total_bounties_paid
            .checked_add(bounty)
            .ok_or(StakingError::MathOverflow)?;
        self.distribution_count = self.distribution_count.saturating_add(1);
        self.last_updated = now;
        Ok(())
    }
}
