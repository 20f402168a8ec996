//! Fee, bounty and slippage arithmetic.
//!
//! All rates are parts per thousand. Products are taken in `u128` and
//! truncated toward zero before narrowing back to `u64`.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;

/// How a withdrawal is split between the burn sink and the owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawalSplit {
    pub burned: u64,
    pub paid_out: u64,
}

/// `floor(numerator * multiplier / denominator)` with a `u128` intermediate.
pub fn mul_div_floor(numerator: u64, multiplier: u64, denominator: u64) -> Result<u64> {
    require!(denominator > 0, StakingError::DivisionByZeroParticipants);

    let product = (numerator as u128)
        .checked_mul(multiplier as u128)
        .ok_or(StakingError::MathOverflow)?;
    let quotient = product
        .checked_div(denominator as u128)
        .ok_or(StakingError::MathOverflow)?;

    u64::try_from(quotient).map_err(|_| error!(StakingError::MathOverflow))
}

/// Portion of `amount` taken at `rate` parts per thousand.
pub fn rate_portion(amount: u64, rate: u16) -> Result<u64> {
    mul_div_floor(amount, rate as u64, RATE_DENOMINATOR)
}

/// Split a withdrawal into the burned fee and the owner's payout.
///
/// The owner's recorded stake always drops by the full `amount`.
pub fn split_withdrawal(amount: u64, withdraw_fee_rate: u16) -> Result<WithdrawalSplit> {
    let burned = rate_portion(amount, withdraw_fee_rate)?;
    let paid_out = amount
        .checked_sub(burned)
        .ok_or(StakingError::MathUnderflow)?;

    Ok(WithdrawalSplit { burned, paid_out })
}

/// Bounty owed to whoever triggers a distribution.
pub fn trigger_bounty(reward_holdings: u64, trigger_bounty_rate: u16) -> Result<u64> {
    rate_portion(reward_holdings, trigger_bounty_rate)
}

/// Smallest acceptable swap output for `amount_in` reward units.
///
/// Valued at a 1:1 nominal baseline, so any combination of slippage and
/// transfer tax above 20% aborts the conversion.
pub fn minimum_swap_output(amount_in: u64) -> Result<u64> {
    mul_div_floor(amount_in, SWAP_MIN_OUTPUT_PERCENT, PERCENT_DENOMINATOR)
}

/// Units that actually arrived in custody between two balance reads.
///
/// Fee-on-transfer mints deliver less than requested, so credits are
/// always measured rather than taken from the nominal transfer amount.
pub fn balance_delta(before: u64, after: u64) -> Result<u64> {
    Ok(after.checked_sub(before).ok_or(StakingError::MathUnderflow)?)
}

/// Preconditions of a distribution round, in the order callers see them.
///
/// An empty reward custody is reported ahead of an empty pool.
pub fn check_distributable(reward_holdings: u64, total_staked: u64) -> Result<()> {
    require!(reward_holdings > 0, StakingError::NoRewardsAvailable);
    require!(total_staked > 0, StakingError::DivisionByZeroParticipants);
    Ok(())
}

/// Validate a withdrawal of `amount` against a recorded `balance`.
///
/// Callers with no stake see `NothingStaked` whatever amount they ask for.
pub fn check_withdrawal(balance: u64, amount: u64) -> Result<()> {
    require!(balance > 0, StakingError::NothingStaked);
    require!(amount > 0, StakingError::InvalidAmount);
    require!(amount <= balance, StakingError::InsufficientStake);
    Ok(())
}

/// Check a settled swap against custody balances and return the stake
/// units it bought.
///
/// The router must have drawn reward tokens out of custody, and the stake
/// vault must have grown by at least the 80% floor of `amount_in`.
pub fn verify_swap(
    amount_in: u64,
    reward_after: u64,
    stake_before: u64,
    stake_after: u64,
) -> Result<u64> {
    require!(reward_after < amount_in, StakingError::SwapOutputMissing);

    let purchased = balance_delta(stake_before, stake_after)?;
    require!(
        purchased >= minimum_swap_output(amount_in)?,
        StakingError::SwapSlippageExceeded
    );

    Ok(purchased)
}

/// Reject rates at or above `limit`.
pub fn validate_rate(rate: u16, limit: u16) -> Result<()> {
    require!(rate < limit, StakingError::ParameterOutOfRange);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_code<T: std::fmt::Debug>(result: Result<T>) -> u32 {
        match result {
            Err(anchor_lang::error::Error::AnchorError(e)) => e.error_code_number,
            other => panic!("expected anchor error, got {:?}", other),
        }
    }

    #[test]
    fn withdrawal_fee_burns_five_percent() {
        let split = split_withdrawal(1_000, 50).unwrap();
        assert_eq!(split.burned, 50);
        assert_eq!(split.paid_out, 950);
    }

    #[test]
    fn withdrawal_fee_truncates_toward_zero() {
        // 19 * 49 / 1000 = 0.931
        let split = split_withdrawal(19, 49).unwrap();
        assert_eq!(split.burned, 0);
        assert_eq!(split.paid_out, 19);

        let split = split_withdrawal(1_999, 49).unwrap();
        assert_eq!(split.burned, 97);
        assert_eq!(split.burned + split.paid_out, 1_999);
    }

    #[test]
    fn zero_fee_pays_everything() {
        let split = split_withdrawal(u64::MAX, 0).unwrap();
        assert_eq!(split.burned, 0);
        assert_eq!(split.paid_out, u64::MAX);
    }

    #[test]
    fn bounty_is_half_a_percent_of_holdings() {
        assert_eq!(trigger_bounty(1_000, 5).unwrap(), 5);
        assert_eq!(trigger_bounty(1_000, 0).unwrap(), 0);
        assert_eq!(trigger_bounty(199, 5).unwrap(), 0);
    }

    #[test]
    fn swap_floor_is_eighty_percent() {
        assert_eq!(minimum_swap_output(995).unwrap(), 796);
        assert_eq!(minimum_swap_output(1_000).unwrap(), 800);
        assert_eq!(minimum_swap_output(1).unwrap(), 0);
    }

    #[test]
    fn large_products_do_not_overflow() {
        assert_eq!(
            mul_div_floor(u64::MAX, u64::MAX, u64::MAX).unwrap(),
            u64::MAX
        );
        assert_eq!(
            error_code(mul_div_floor(u64::MAX, 2, 1)),
            u32::from(StakingError::MathOverflow)
        );
    }

    #[test]
    fn delta_measures_fee_on_transfer_credit() {
        // 100 requested, 10% withheld in transit.
        assert_eq!(balance_delta(500, 590).unwrap(), 90);
        assert_eq!(
            error_code(balance_delta(590, 500)),
            u32::from(StakingError::MathUnderflow)
        );
    }

    #[test]
    fn rate_bounds_are_exclusive() {
        assert!(validate_rate(49, WITHDRAW_FEE_RATE_LIMIT).is_ok());
        assert_eq!(
            error_code(validate_rate(50, WITHDRAW_FEE_RATE_LIMIT)),
            u32::from(StakingError::ParameterOutOfRange)
        );
        assert!(validate_rate(14, TRIGGER_BOUNTY_RATE_LIMIT).is_ok());
        assert_eq!(
            error_code(validate_rate(15, TRIGGER_BOUNTY_RATE_LIMIT)),
            u32::from(StakingError::ParameterOutOfRange)
        );
    }

    #[test]
    fn swap_at_the_floor_is_accepted() {
        assert_eq!(verify_swap(995, 0, 10_000, 10_796).unwrap(), 796);
    }

    #[test]
    fn swap_below_the_floor_is_rejected() {
        assert_eq!(
            error_code(verify_swap(995, 0, 10_000, 10_795)),
            u32::from(StakingError::SwapSlippageExceeded)
        );
    }

    #[test]
    fn swap_that_leaves_custody_untouched_is_rejected() {
        assert_eq!(
            error_code(verify_swap(995, 995, 10_000, 11_000)),
            u32::from(StakingError::SwapOutputMissing)
        );
    }

    #[test]
    fn swap_that_shrinks_the_stake_vault_is_rejected() {
        assert_eq!(
            error_code(verify_swap(995, 0, 10_000, 9_999)),
            u32::from(StakingError::MathUnderflow)
        );
    }

    #[test]
    fn bounty_is_paid_before_the_rest_is_swapped() {
        let holdings = 1_000;
        let bounty = trigger_bounty(holdings, 5).unwrap();
        assert_eq!(bounty, 5);

        // Custody is re-read after the bounty transfer.
        let reward_after_bounty = holdings - bounty;
        let bounty_paid = balance_delta(reward_after_bounty, holdings).unwrap();
        assert_eq!(bounty_paid, 5);

        let amount_in = reward_after_bounty;
        assert_eq!(amount_in, 995);
        assert_eq!(minimum_swap_output(amount_in).unwrap(), 796);
        assert_eq!(verify_swap(amount_in, 0, 0, 900).unwrap(), 900);
    }

    #[test]
    fn empty_custody_is_reported_before_empty_pool() {
        assert_eq!(
            error_code(check_distributable(0, 0)),
            u32::from(StakingError::NoRewardsAvailable)
        );
        assert_eq!(
            error_code(check_distributable(0, 1_000)),
            u32::from(StakingError::NoRewardsAvailable)
        );
        assert_eq!(
            error_code(check_distributable(1_000, 0)),
            u32::from(StakingError::DivisionByZeroParticipants)
        );
        assert!(check_distributable(1, 1).is_ok());
    }

    #[test]
    fn withdrawal_without_stake_reports_nothing_staked() {
        assert_eq!(
            error_code(check_withdrawal(0, 0)),
            u32::from(StakingError::NothingStaked)
        );
        assert_eq!(
            error_code(check_withdrawal(0, 100)),
            u32::from(StakingError::NothingStaked)
        );
        assert_eq!(
            error_code(check_withdrawal(500, 0)),
            u32::from(StakingError::InvalidAmount)
        );
        assert_eq!(
            error_code(check_withdrawal(500, 501)),
            u32::from(StakingError::InsufficientStake)
        );
        assert!(check_withdrawal(500, 500).is_ok());
    }
}
