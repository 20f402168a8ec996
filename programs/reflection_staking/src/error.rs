//! Error types for the Reflection Staking program.
//!
//! Every instruction aborts with one of these codes; the runtime rolls back
//! all account and token changes made by the failed instruction.

use anchor_lang::prelude::*;

/// Custom error codes for the Reflection Staking program.
///
/// Error codes start at 6000 (Anchor's custom error offset).
#[error_code]
pub enum StakingError {
    // ========== Input Validation Errors ==========

    /// [6000] Zero or otherwise nonsensical amount supplied.
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    /// [6001] Fee or bounty rate configuration rejected.
    #[msg("Rate is outside the allowed range")]
    ParameterOutOfRange,

    /// [6002] Depositor holds none of the stake asset.
    #[msg("Depositor holds no stake tokens")]
    NoStakeAssetHeld,

    // ========== Stake/Balance Errors ==========

    /// [6003] Withdrawal exceeds the recorded stake.
    #[msg("Withdrawal exceeds staked balance")]
    InsufficientStake,

    /// [6004] Caller has no recorded stake.
    #[msg("Nothing staked for this owner")]
    NothingStaked,

    /// [6005] The ledger already holds the maximum number of participants.
    #[msg("Participant limit reached")]
    ParticipantLimitReached,

    // ========== Distribution/Swap Errors ==========

    /// [6006] Reward custody is empty.
    #[msg("No rewards available to distribute")]
    NoRewardsAvailable,

    /// [6007] Distribution attempted with zero total staked.
    #[msg("Cannot distribute with zero participants")]
    DivisionByZeroParticipants,

    /// [6008] Router returned less than the minimum output.
    #[msg("Swap output below minimum")]
    SwapSlippageExceeded,

    /// [6009] Swap deadline passed. The router enforces it.
    #[msg("Swap deadline exceeded")]
    SwapDeadlineExceeded,

    /// [6010] Router did not consume the reward input.
    #[msg("Swap did not consume reward tokens")]
    SwapOutputMissing,

    // ========== Math/Overflow Errors ==========

    /// [6011] Arithmetic overflow occurred during calculation.
    #[msg("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// [6012] Arithmetic underflow occurred during calculation.
    #[msg("Arithmetic underflow occurred during calculation")]
    MathUnderflow,

    // ========== Authorization Errors ==========

    /// [6013] Unauthorized - caller is not the pool authority.
    #[msg("Unauthorized: caller is not the pool authority")]
    Unauthorized,

    /// [6014] New authority is the default pubkey.
    #[msg("Invalid authority")]
    InvalidAuthority,

    // ========== Account Validation Errors ==========

    /// [6015] Token account or mint does not match the pool.
    #[msg("Token mint mismatch - wrong token for this pool")]
    MintMismatch,

    /// [6016] The provided vault does not match the pool's vault.
    #[msg("Vault address mismatch")]
    VaultMismatch,

    /// [6017] Vault owner is not the stake pool PDA.
    #[msg("Vault owner must be the stake pool PDA")]
    InvalidVaultOwner,

    /// [6018] Router program does not match the pool's configured router.
    #[msg("Swap program mismatch")]
    InvalidSwapProgram,

    /// [6019] Ledger does not belong to this pool.
    #[msg("Stake ledger does not belong to this pool")]
    LedgerMismatch,

    // ========== Concurrency Errors ==========

    /// [6020] Pool entry point re-entered while an operation is in flight.
    #[msg("Reentrant call rejected")]
    Reentrancy,
}
