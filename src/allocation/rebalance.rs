use crate::allocation::fee::{deduct_fee, FeeSchedule};
use crate::allocation::waterfall::{create_transfers, Allocation};
use crate::core::account::{AccountId, ClosingAccount, RecipientAccount};
use crate::core::aggregate::{total_amount, total_credit, AggregateError};
use crate::core::transfer::Transfer;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// The check at which a rebalance ran out of funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundsCheck {
    /// Closing surplus is below the total credit owed.
    PreCheck,
    /// Leftover surplus cannot pay the operational fee.
    Fee,
}

impl fmt::Display for FundsCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FundsCheck::PreCheck => write!(f, "pre-check"),
            FundsCheck::Fee => write!(f, "fee"),
        }
    }
}

/// Errors that abort a rebalance. No partial plan is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RebalanceError {
    #[error("not enough funds for rebalance ({stage}): available {available}, required {required}")]
    InsufficientFunds {
        stage: FundsCheck,
        available: u64,
        required: u64,
    },
    #[error("no closing accounts supplied")]
    NoClosingAccounts,
    #[error("no recipient accounts supplied")]
    NoRecipientAccounts,
    #[error("amount overflow while computing {0}")]
    AmountOverflow(&'static str),
}

impl RebalanceError {
    /// The failing funds check, if this is an insufficient-funds error.
    pub fn funds_check(&self) -> Option<FundsCheck> {
        match self {
            RebalanceError::InsufficientFunds { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// A computed rebalance plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceResult {
    /// Identifier handed to whoever executes the plan.
    plan_id: Uuid,
    computed_at: DateTime<Utc>,
    /// Transfers after fee deduction, zero-amount entries removed.
    transfers: Vec<Transfer>,
    operational_fee: u64,
    /// Entries the fee was charged for, counted before deduction.
    charged_entries: usize,
    /// Closing surplus before the run.
    gross_total: u64,
}

impl RebalanceResult {
    pub fn plan_id(&self) -> Uuid {
        self.plan_id
    }

    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn into_transfers(self) -> Vec<Transfer> {
        self.transfers
    }

    pub fn operational_fee(&self) -> u64 {
        self.operational_fee
    }

    pub fn charged_entries(&self) -> usize {
        self.charged_entries
    }

    pub fn gross_total(&self) -> u64 {
        self.gross_total
    }

    /// Sum of every entry, leftovers included.
    pub fn total_transferred(&self) -> u64 {
        self.transfers.iter().map(Transfer::amount).sum()
    }

    /// Sum of payments to recipients.
    pub fn total_paid(&self) -> u64 {
        self.payments().map(Transfer::amount).sum()
    }

    /// Leftover surplus remaining after the fee.
    pub fn total_leftover(&self) -> u64 {
        self.leftovers().map(Transfer::amount).sum()
    }

    /// Total paid to one recipient.
    pub fn paid_to(&self, recipient: &AccountId) -> u64 {
        self.payments()
            .filter(|t| t.to_account() == Some(recipient))
            .map(Transfer::amount)
            .sum()
    }

    pub fn payments(&self) -> impl Iterator<Item = &Transfer> {
        self.transfers.iter().filter(|t| !t.is_leftover())
    }

    pub fn leftovers(&self) -> impl Iterator<Item = &Transfer> {
        self.transfers.iter().filter(|t| t.is_leftover())
    }

    /// Operational fee as a fraction of the gross closing surplus.
    pub fn fee_ratio(&self) -> f64 {
        if self.gross_total == 0 {
            return 0.0;
        }
        self.operational_fee as f64 / self.gross_total as f64
    }
}

impl fmt::Display for RebalanceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Rebalance Plan ===")?;
        writeln!(f, "Plan ID:         {}", self.plan_id)?;
        writeln!(f, "Gross Total:     {}", self.gross_total)?;
        writeln!(f, "Paid:            {}", self.total_paid())?;
        writeln!(f, "Leftover:        {}", self.total_leftover())?;
        writeln!(
            f,
            "Operational Fee: {} ({} entries, {:.2}%)",
            self.operational_fee,
            self.charged_entries,
            self.fee_ratio() * 100.0
        )?;

        writeln!(f, "\nTransfers:")?;
        for (i, transfer) in self.transfers.iter().enumerate() {
            writeln!(f, "  {:>3}. {}", i + 1, transfer)?;
        }
        Ok(())
    }
}

/// Drives the waterfall across closing accounts and charges the fee.
#[derive(Debug, Clone, Default)]
pub struct RebalanceEngine {
    schedule: FeeSchedule,
}

impl RebalanceEngine {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> FeeSchedule {
        self.schedule
    }

    /// Plan the transfers that clear every recipient's credit.
    ///
    /// # Algorithm
    ///
    /// 1. Reject the run if total closing surplus is below total credit.
    /// 2. Drain each closing account in order with one [`create_transfers`]
    ///    call, threading the remaining recipient queue from one account to
    ///    the next. A call either exhausts the account or empties the queue.
    ///    Once the queue is empty, each closing account's surplus is
    ///    recorded as a leftover entry and added to the fee pool.
    /// 3. Charge `per_transfer` for every entry, leftovers included, and
    ///    reject the run if the fee pool cannot cover it.
    /// 4. Deduct the fee from the tail of the list and drop zero entries.
    pub fn rebalance(
        &self,
        closing_accounts: &[ClosingAccount],
        recipient_accounts: &[RecipientAccount],
    ) -> Result<RebalanceResult, RebalanceError> {
        let total_credit = total_credit(recipient_accounts).map_err(|e| match e {
            AggregateError::Empty => RebalanceError::NoRecipientAccounts,
            AggregateError::Overflow => RebalanceError::AmountOverflow("total credit"),
        })?;
        let total_amount = total_amount(closing_accounts).map_err(|e| match e {
            AggregateError::Empty => RebalanceError::NoClosingAccounts,
            AggregateError::Overflow => RebalanceError::AmountOverflow("total amount"),
        })?;

        if total_amount < total_credit {
            warn!(
                "rebalance rejected: closing surplus {} below recipient credit {}",
                total_amount, total_credit
            );
            return Err(RebalanceError::InsufficientFunds {
                stage: FundsCheck::PreCheck,
                available: total_amount,
                required: total_credit,
            });
        }

        let mut transfers: Vec<Transfer> = Vec::new();
        let mut remaining = recipient_accounts.to_vec();
        let mut fee_pool = 0u64;

        for account in closing_accounts {
            let Allocation {
                closing_account,
                transfers: emitted,
                remaining_recipients,
            } = create_transfers(account, &remaining);
            transfers.extend(emitted);
            remaining = remaining_recipients;

            if remaining.is_empty() {
                // Bounded by total_amount, which did not overflow.
                fee_pool += closing_account.amount;
                transfers.push(Transfer::leftover(
                    closing_account.account_id.clone(),
                    closing_account.amount,
                ));
            } else {
                debug_assert!(closing_account.is_exhausted());
            }
            debug!(
                "drained {}: {} entries so far, {} recipients outstanding, fee pool {}",
                account.account_id,
                transfers.len(),
                remaining.len(),
                fee_pool
            );
        }
        debug_assert!(remaining.is_empty());

        let charged_entries = transfers.len();
        let operational_fee = self
            .schedule
            .fee_for(charged_entries)
            .ok_or(RebalanceError::AmountOverflow("operational fee"))?;

        if operational_fee > fee_pool {
            warn!(
                "rebalance rejected: fee {} for {} entries exceeds fee pool {}",
                operational_fee, charged_entries, fee_pool
            );
            return Err(RebalanceError::InsufficientFunds {
                stage: FundsCheck::Fee,
                available: fee_pool,
                required: operational_fee,
            });
        }

        let transfers = deduct_fee(operational_fee, transfers);
        info!(
            "rebalance planned: {} transfers, fee {}, gross {}",
            transfers.len(),
            operational_fee,
            total_amount
        );

        Ok(RebalanceResult {
            plan_id: Uuid::new_v4(),
            computed_at: Utc::now(),
            transfers,
            operational_fee,
            charged_entries,
            gross_total: total_amount,
        })
    }
}

/// Plan a rebalance with the default fee schedule.
///
/// # Examples
///
/// ```
/// use rebalance_engine::allocation::rebalance::rebalance;
/// use rebalance_engine::core::account::{ClosingAccount, RecipientAccount};
/// use rebalance_engine::core::transfer::Transfer;
///
/// let closing = vec![
///     ClosingAccount::new("acc1", 500),
///     ClosingAccount::new("acc2", 500),
/// ];
/// let recipients = vec![RecipientAccount::new("rec1", 400)];
///
/// let result = rebalance(&closing, &recipients).unwrap();
/// assert_eq!(result.operational_fee(), 30);
/// assert_eq!(result.transfers(), &[
///     Transfer::payment("acc1", "rec1", 400),
///     Transfer::leftover("acc1", 100),
///     Transfer::leftover("acc2", 470),
/// ]);
/// ```
pub fn rebalance(
    closing_accounts: &[ClosingAccount],
    recipient_accounts: &[RecipientAccount],
) -> Result<RebalanceResult, RebalanceError> {
    RebalanceEngine::default().rebalance(closing_accounts, recipient_accounts)
}
