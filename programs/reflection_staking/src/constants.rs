//! Program constants for the Reflection Staking program.
//!
//! Seeds, rate bounds and the fixed swap tolerances used by the
//! distribution engine.

/// Seed for deriving the stake pool PDA
pub const STAKE_POOL_SEED: &[u8] = b"stake_pool";

/// Seed for deriving the stake ledger PDA
pub const STAKE_LEDGER_SEED: &[u8] = b"stake_ledger";

/// Seed for deriving the stake vault PDA (custody of the stake asset)
pub const STAKE_VAULT_SEED: &[u8] = b"stake_vault";

/// Denominator for fee and bounty rates (parts per thousand)
pub const RATE_DENOMINATOR: u64 = 1_000;

/// Withdrawal fee rates must stay strictly below this value (5%)
pub const WITHDRAW_FEE_RATE_LIMIT: u16 = 50;

/// Trigger bounty rates must stay strictly below this value (1.5%)
pub const TRIGGER_BOUNTY_RATE_LIMIT: u16 = 15;

/// Minimum swap output as a percentage of the input, valued 1:1
pub const SWAP_MIN_OUTPUT_PERCENT: u64 = 80;

/// Percent denominator for the swap floor
pub const PERCENT_DENOMINATOR: u64 = 100;

/// Seconds the router is given to settle a swap
pub const SWAP_DEADLINE_SECONDS: i64 = 3_600;

/// Upper bound on ledger entries.
///
/// The ledger is deserialized onto the 32 KiB program heap. Borsh starts the
/// entry vector at 102 slots and doubles it while reading, and the bump
/// allocator never frees the smaller buffers, so 200 entries peak at
/// 12,240 bytes while 205 already need 28,560.
pub const MAX_PARTICIPANTS: usize = 200;

/// Name of the router instruction invoked for reward conversion
pub const SWAP_INSTRUCTION_NAME: &str = "swap_exact_in";
