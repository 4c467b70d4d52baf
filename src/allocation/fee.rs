use crate::core::transfer::Transfer;
use serde::{Deserialize, Serialize};

/// Flat fee charged for every entry of a rebalance plan.
pub const DEFAULT_FEE_PER_TRANSFER: u64 = 10;

/// How the operational fee is computed from a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Units charged per transfer, leftover entries included.
    pub per_transfer: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            per_transfer: DEFAULT_FEE_PER_TRANSFER,
        }
    }
}

impl FeeSchedule {
    pub fn new(per_transfer: u64) -> Self {
        Self { per_transfer }
    }

    /// Fee owed for a plan of `transfer_count` entries, or `None` on overflow.
    pub fn fee_for(&self, transfer_count: usize) -> Option<u64> {
        u64::try_from(transfer_count)
            .ok()?
            .checked_mul(self.per_transfer)
    }
}

/// Deduct `fee` from a transfer list, starting with the last entry.
///
/// Each entry, walking backwards, gives up as much of its amount as the
/// outstanding fee requires. The walk stops once the fee is covered.
/// Entries left at zero are removed, including zero-amount entries the
/// walk never reached. If the list cannot cover the fee, every entry is
/// consumed and the uncovered part is dropped; callers check the fee
/// against the available pool beforehand.
///
/// # Examples
///
/// ```
/// use rebalance_engine::allocation::fee::deduct_fee;
/// use rebalance_engine::core::transfer::Transfer;
///
/// let transfers = vec![
///     Transfer::payment("acc1", "rec1", 400),
///     Transfer::leftover("acc1", 100),
///     Transfer::leftover("acc2", 20),
/// ];
///
/// let reduced = deduct_fee(30, transfers);
/// assert_eq!(reduced, vec![
///     Transfer::payment("acc1", "rec1", 400),
///     Transfer::leftover("acc1", 90),
/// ]);
/// ```
pub fn deduct_fee(fee: u64, mut transfers: Vec<Transfer>) -> Vec<Transfer> {
    let mut outstanding = fee;
    for transfer in transfers.iter_mut().rev() {
        if outstanding == 0 {
            break;
        }
        let amount = transfer.amount();
        let taken = amount.min(outstanding);
        *transfer = transfer.with_amount(amount - taken);
        outstanding -= taken;
    }

    transfers.retain(|t| t.amount() > 0);
    transfers
}
