use anchor_lang::prelude::*;

use crate::constants::MAX_PARTICIPANTS;
use crate::error::StakingError;
use crate::math::mul_div_floor;

/// One participant's recorded stake.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeEntry {
    pub owner: Pubkey,
    pub amount: u64,
}

impl StakeEntry {
    pub const LEN: usize = 32 + 8;
}

/// Outcome of one proportional distribution pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// Units credited to participants in this pass.
    pub allocated: u64,
    /// Truncation remainder carried into the next pass.
    pub carried_dust: u64,
}

/// Authoritative record of who has staked how much.
///
/// Entries are kept sorted by owner and only ever hold strictly positive
/// amounts, so the entry list is the participant set. `total_staked` equals
/// the sum of all entry amounts after every operation.
#[account]
pub struct StakeLedger {
    pub pool: Pubkey,
    pub total_staked: u64,
    /// Rounding remainder from earlier distributions, still in custody and
    /// folded into the next pass.
    pub undistributed_dust: u64,
    pub bump: u8,
    pub entries: Vec<StakeEntry>,
}

impl StakeLedger {
    const BASE_LEN: usize = 8 + 32 + 8 + 8 + 1 + 4;

    /// Account size holding `participants` entries.
    pub fn space(participants: usize) -> usize {
        Self::BASE_LEN + participants * StakeEntry::LEN
    }

    pub fn stake_of(&self, owner: &Pubkey) -> u64 {
        self.position(owner)
            .map(|index| self.entries[index].amount)
            .unwrap_or(0)
    }

    pub fn participant_count(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, owner: &Pubkey) -> bool {
        self.position(owner).is_ok()
    }

    /// Entry count after crediting `owner`.
    pub fn len_after_credit(&self, owner: &Pubkey) -> usize {
        if self.contains(owner) {
            self.entries.len()
        } else {
            self.entries.len() + 1
        }
    }

    /// Entry count after debiting `amount` from `owner`.
    pub fn len_after_debit(&self, owner: &Pubkey, amount: u64) -> usize {
        match self.position(owner) {
            Ok(index) if amount > 0 && self.entries[index].amount == amount => {
                self.entries.len() - 1
            }
            _ => self.entries.len(),
        }
    }

    /// Credit `amount` to `owner`, admitting it to the participant set if new.
    pub fn credit_new_stake(&mut self, owner: Pubkey, amount: u64) -> Result<()> {
        require!(amount > 0, StakingError::InvalidAmount);

        let total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;

        match self.position(&owner) {
            Ok(index) => {
                let entry = &mut self.entries[index];
                entry.amount = entry
                    .amount
                    .checked_add(amount)
                    .ok_or(StakingError::MathOverflow)?;
            }
            Err(index) => {
                require!(
                    self.entries.len() < MAX_PARTICIPANTS,
                    StakingError::ParticipantLimitReached
                );
                self.entries.insert(index, StakeEntry { owner, amount });
            }
        }

        self.total_staked = total_staked;
        Ok(())
    }

    /// Debit `amount` from `owner`, dropping the entry when it reaches zero.
    ///
    /// Returns the owner's remaining stake.
    pub fn debit_stake(&mut self, owner: &Pubkey, amount: u64) -> Result<u64> {
        require!(amount > 0, StakingError::InvalidAmount);

        let index = self
            .position(owner)
            .map_err(|_| error!(StakingError::NothingStaked))?;
        let remaining = self.entries[index]
            .amount
            .checked_sub(amount)
            .ok_or(StakingError::InsufficientStake)?;
        let total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(StakingError::MathUnderflow)?;

        if remaining == 0 {
            self.entries.remove(index);
        } else {
            self.entries[index].amount = remaining;
        }

        self.total_staked = total_staked;
        Ok(remaining)
    }

    /// Spread `new_units` over every participant in proportion to stake.
    ///
    /// Shares are computed against the pre-distribution total and balances,
    /// then floored. The pot includes dust carried from earlier passes; the
    /// new remainder is carried again, so `total_staked` only grows by what
    /// was actually credited. Cost is linear in the participant count.
    pub fn distribute_proportionally(&mut self, new_units: u64) -> Result<Allocation> {
        let snapshot_total = self.total_staked;
        require!(
            snapshot_total > 0,
            StakingError::DivisionByZeroParticipants
        );

        let pot = new_units
            .checked_add(self.undistributed_dust)
            .ok_or(StakingError::MathOverflow)?;

        let mut allocated: u64 = 0;
        for entry in self.entries.iter_mut() {
            let share = mul_div_floor(pot, entry.amount, snapshot_total)?;
            entry.amount = entry
                .amount
                .checked_add(share)
                .ok_or(StakingError::MathOverflow)?;
            allocated = allocated
                .checked_add(share)
                .ok_or(StakingError::MathOverflow)?;
        }

        let carried_dust = pot
            .checked_sub(allocated)
            .ok_or(StakingError::MathUnderflow)?;

        self.total_staked = snapshot_total
            .checked_add(allocated)
            .ok_or(StakingError::MathOverflow)?;
        self.undistributed_dust = carried_dust;

        Ok(Allocation {
            allocated,
            carried_dust,
        })
    }

    fn position(&self, owner: &Pubkey) -> std::result::Result<usize, usize> {
        self.entries.binary_search_by(|entry| entry.owner.cmp(owner))
    }
}

#[cfg(test)]
mod tests {
    use std::alloc::{GlobalAlloc, Layout, System};
    use std::cell::Cell;

    use super::*;

    /// Counts bytes requested on the current thread and never gives any
    /// back, the way the on-chain bump allocator behaves.
    struct BumpCounter;

    thread_local! {
        static ALLOCATED: Cell<usize> = const { Cell::new(0) };
    }

    unsafe impl GlobalAlloc for BumpCounter {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let _ = ALLOCATED.try_with(|total| total.set(total.get() + layout.size()));
            System.alloc(layout)
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            System.dealloc(ptr, layout)
        }
    }

    #[global_allocator]
    static ALLOCATOR: BumpCounter = BumpCounter;

    /// Program heap available to an instruction.
    const HEAP_BYTES: usize = 32 * 1024;

    fn heap_used<T>(f: impl FnOnce() -> T) -> (T, usize) {
        let start = ALLOCATED.with(Cell::get);
        let value = f();
        (value, ALLOCATED.with(Cell::get) - start)
    }

    fn ledger() -> StakeLedger {
        StakeLedger {
            pool: Pubkey::new_unique(),
            total_staked: 0,
            undistributed_dust: 0,
            bump: 255,
            entries: Vec::new(),
        }
    }

    fn error_code<T: std::fmt::Debug>(result: Result<T>) -> u32 {
        match result {
            Err(anchor_lang::error::Error::AnchorError(e)) => e.error_code_number,
            other => panic!("expected anchor error, got {:?}", other),
        }
    }

    fn assert_consistent(ledger: &StakeLedger) {
        let sum: u64 = ledger.entries.iter().map(|entry| entry.amount).sum();
        assert_eq!(ledger.total_staked, sum);
        assert!(ledger.entries.iter().all(|entry| entry.amount > 0));
        assert!(ledger
            .entries
            .windows(2)
            .all(|pair| pair[0].owner < pair[1].owner));
    }

    #[test]
    fn unknown_owner_has_zero_stake() {
        let ledger = ledger();
        assert_eq!(ledger.stake_of(&Pubkey::new_unique()), 0);
        assert_eq!(ledger.participant_count(), 0);
    }

    #[test]
    fn credit_admits_and_accumulates() {
        let mut ledger = ledger();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();

        ledger.credit_new_stake(alice, 100).unwrap();
        ledger.credit_new_stake(bob, 40).unwrap();
        ledger.credit_new_stake(alice, 10).unwrap();

        assert_eq!(ledger.stake_of(&alice), 110);
        assert_eq!(ledger.stake_of(&bob), 40);
        assert_eq!(ledger.participant_count(), 2);
        assert_eq!(ledger.total_staked, 150);
        assert_consistent(&ledger);
    }

    #[test]
    fn zero_credit_is_rejected() {
        let mut ledger = ledger();
        assert_eq!(
            error_code(ledger.credit_new_stake(Pubkey::new_unique(), 0)),
            u32::from(StakingError::InvalidAmount)
        );
        assert_eq!(ledger.participant_count(), 0);
    }

    #[test]
    fn partial_debit_keeps_membership() {
        let mut ledger = ledger();
        let alice = Pubkey::new_unique();
        ledger.credit_new_stake(alice, 100).unwrap();

        assert_eq!(ledger.debit_stake(&alice, 30).unwrap(), 70);
        assert!(ledger.contains(&alice));
        assert_eq!(ledger.total_staked, 70);
        assert_consistent(&ledger);
    }

    #[test]
    fn full_exit_removes_membership() {
        let mut ledger = ledger();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        ledger.credit_new_stake(alice, 100).unwrap();
        ledger.credit_new_stake(bob, 50).unwrap();

        assert_eq!(ledger.debit_stake(&alice, 100).unwrap(), 0);
        assert!(!ledger.contains(&alice));
        assert_eq!(ledger.participant_count(), 1);

        // Exited owners take no part in later distributions.
        ledger.distribute_proportionally(30).unwrap();
        assert_eq!(ledger.stake_of(&alice), 0);
        assert_eq!(ledger.stake_of(&bob), 80);
        assert_consistent(&ledger);
    }

    #[test]
    fn debit_errors_leave_ledger_untouched() {
        let mut ledger = ledger();
        let alice = Pubkey::new_unique();
        ledger.credit_new_stake(alice, 100).unwrap();

        assert_eq!(
            error_code(ledger.debit_stake(&alice, 101)),
            u32::from(StakingError::InsufficientStake)
        );
        assert_eq!(
            error_code(ledger.debit_stake(&alice, 0)),
            u32::from(StakingError::InvalidAmount)
        );
        assert_eq!(
            error_code(ledger.debit_stake(&Pubkey::new_unique(), 1)),
            u32::from(StakingError::NothingStaked)
        );
        assert_eq!(ledger.stake_of(&alice), 100);
        assert_eq!(ledger.total_staked, 100);
    }

    #[test]
    fn distribution_is_proportional_to_stake() {
        let mut ledger = ledger();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        ledger.credit_new_stake(alice, 200).unwrap();
        ledger.credit_new_stake(bob, 100).unwrap();

        let allocation = ledger.distribute_proportionally(300).unwrap();

        assert_eq!(ledger.stake_of(&alice), 400);
        assert_eq!(ledger.stake_of(&bob), 200);
        assert_eq!(allocation.allocated, 300);
        assert_eq!(allocation.carried_dust, 0);
        assert_consistent(&ledger);
    }

    #[test]
    fn shares_use_the_pre_distribution_snapshot() {
        let mut ledger = ledger();
        let owners: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        for owner in &owners {
            ledger.credit_new_stake(*owner, 100).unwrap();
        }

        ledger.distribute_proportionally(90).unwrap();

        // Equal stakes earn equal shares regardless of iteration order.
        for owner in &owners {
            assert_eq!(ledger.stake_of(owner), 130);
        }
    }

    #[test]
    fn truncation_dust_is_carried_forward() {
        let mut ledger = ledger();
        let owners: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        for owner in &owners {
            ledger.credit_new_stake(*owner, 100).unwrap();
        }

        let first = ledger.distribute_proportionally(10).unwrap();
        assert_eq!(first.allocated, 9);
        assert_eq!(first.carried_dust, 1);
        assert_eq!(ledger.undistributed_dust, 1);
        assert_eq!(ledger.total_staked, 309);
        assert_consistent(&ledger);

        // 1 carried + 2 new = 3 units, one for each equal stake.
        let second = ledger.distribute_proportionally(2).unwrap();
        assert_eq!(second.allocated, 3);
        assert_eq!(second.carried_dust, 0);
        for owner in &owners {
            assert_eq!(ledger.stake_of(owner), 104);
        }
        assert_consistent(&ledger);
    }

    #[test]
    fn dust_accumulates_across_small_rounds() {
        let mut ledger = ledger();
        ledger.credit_new_stake(Pubkey::new_unique(), 600).unwrap();
        ledger.credit_new_stake(Pubkey::new_unique(), 400).unwrap();

        // One unit cannot be split 60/40 until enough has accumulated.
        ledger.distribute_proportionally(1).unwrap();
        assert_eq!(ledger.undistributed_dust, 1);
        ledger.distribute_proportionally(1).unwrap();
        assert_eq!(ledger.undistributed_dust, 1);
        assert_eq!(ledger.total_staked, 1_001);
        assert_consistent(&ledger);
    }

    #[test]
    fn empty_ledger_refuses_to_distribute() {
        let mut ledger = ledger();
        assert_eq!(
            error_code(ledger.distribute_proportionally(100)),
            u32::from(StakingError::DivisionByZeroParticipants)
        );
        assert_eq!(ledger.total_staked, 0);
        assert_eq!(ledger.undistributed_dust, 0);
    }

    #[test]
    fn participant_cap_is_enforced() {
        let mut ledger = ledger();
        for _ in 0..MAX_PARTICIPANTS {
            ledger.credit_new_stake(Pubkey::new_unique(), 1).unwrap();
        }
        assert_eq!(
            error_code(ledger.credit_new_stake(Pubkey::new_unique(), 1)),
            u32::from(StakingError::ParticipantLimitReached)
        );

        // Existing participants may still top up.
        let existing = ledger.entries[0].owner;
        ledger.credit_new_stake(existing, 5).unwrap();
        assert_eq!(ledger.stake_of(&existing), 6);
    }

    #[test]
    fn sizing_tracks_membership_changes() {
        let mut ledger = ledger();
        let alice = Pubkey::new_unique();

        assert_eq!(ledger.len_after_credit(&alice), 1);
        ledger.credit_new_stake(alice, 10).unwrap();
        assert_eq!(ledger.len_after_credit(&alice), 1);

        assert_eq!(ledger.len_after_debit(&alice, 4), 1);
        assert_eq!(ledger.len_after_debit(&alice, 10), 0);
        assert_eq!(ledger.len_after_debit(&alice, 11), 1);
        assert_eq!(ledger.len_after_debit(&Pubkey::new_unique(), 10), 1);

        assert_eq!(
            StakeLedger::space(2) - StakeLedger::space(1),
            StakeEntry::LEN
        );
    }

    #[test]
    fn mixed_operations_preserve_the_total() {
        let mut ledger = ledger();
        let owners: Vec<Pubkey> = (0..5).map(|_| Pubkey::new_unique()).collect();

        for (i, owner) in owners.iter().enumerate() {
            ledger.credit_new_stake(*owner, 17 * (i as u64 + 1)).unwrap();
        }
        ledger.distribute_proportionally(1_003).unwrap();
        ledger.debit_stake(&owners[1], 20).unwrap();
        let remaining = ledger.stake_of(&owners[3]);
        ledger.debit_stake(&owners[3], remaining).unwrap();
        ledger.distribute_proportionally(77).unwrap();
        ledger.credit_new_stake(owners[3], 9).unwrap();

        assert_consistent(&ledger);
        assert_eq!(ledger.participant_count(), 5);
    }

    fn full_ledger(entries: usize) -> Vec<u8> {
        let mut ledger = ledger();
        for _ in 0..entries {
            ledger.credit_new_stake(Pubkey::new_unique(), 1_000).unwrap();
        }
        let mut data = Vec::with_capacity(StakeLedger::space(entries));
        ledger.try_serialize(&mut data).unwrap();
        data
    }

    #[test]
    fn full_ledger_deserializes_within_half_the_heap() {
        let data = full_ledger(MAX_PARTICIPANTS);

        let (ledger, used) = heap_used(|| StakeLedger::try_deserialize(&mut &data[..]).unwrap());

        assert_eq!(ledger.participant_count(), MAX_PARTICIPANTS);
        assert!(used <= HEAP_BYTES / 2, "deserializing used {} bytes", used);
    }

    #[test]
    fn last_admission_fits_the_deserialized_capacity() {
        let data = full_ledger(MAX_PARTICIPANTS - 1);

        let (ledger, used) = heap_used(|| {
            let mut ledger = StakeLedger::try_deserialize(&mut &data[..]).unwrap();
            ledger.credit_new_stake(Pubkey::new_unique(), 1_000).unwrap();
            ledger
        });

        assert_eq!(ledger.participant_count(), MAX_PARTICIPANTS);
        assert!(used <= HEAP_BYTES / 2, "admission used {} bytes", used);
    }
}
