use crate::core::account::{ClosingAccount, RecipientAccount};
use crate::core::transfer::Transfer;
use serde::{Deserialize, Serialize};

/// State produced by draining one closing account into the recipient queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// The closing account carrying whatever surplus it has left.
    pub closing_account: ClosingAccount,
    /// Payments emitted by this call, in recipient order.
    pub transfers: Vec<Transfer>,
    /// Recipients still owed something, head first.
    pub remaining_recipients: Vec<RecipientAccount>,
}

impl Allocation {
    /// True when every recipient has been paid in full.
    pub fn recipients_exhausted(&self) -> bool {
        self.remaining_recipients.is_empty()
    }
}

/// Pay recipients in order from a single closing account.
///
/// Recipients are served strictly front to back. A recipient whose credit
/// is below the remaining surplus is paid in full and dropped from the
/// queue. Otherwise the recipient receives the whole remaining surplus,
/// the closing account is exhausted, and the walk stops. If that payment
/// covers the credit exactly, the recipient is dropped as well; only a
/// partially paid recipient stays at the head of the queue.
///
/// A closing account with no surplus left still emits a zero payment to
/// the head recipient, which is charged for and later filtered out.
/// Recipients whose credit is already zero are treated as settled and
/// skipped without emitting a payment.
///
/// Every call either empties the recipient queue or exhausts the closing
/// account.
///
/// # Examples
///
/// ```
/// use rebalance_engine::allocation::waterfall::create_transfers;
/// use rebalance_engine::core::account::{ClosingAccount, RecipientAccount};
/// use rebalance_engine::core::transfer::Transfer;
///
/// let closing = ClosingAccount::new("acc1", 50);
/// let recipients = vec![
///     RecipientAccount::new("rec1", 30),
///     RecipientAccount::new("rec2", 30),
/// ];
///
/// let allocation = create_transfers(&closing, &recipients);
/// assert_eq!(allocation.transfers, vec![
///     Transfer::payment("acc1", "rec1", 30),
///     Transfer::payment("acc1", "rec2", 20),
/// ]);
/// assert_eq!(allocation.closing_account.amount, 0);
/// assert_eq!(allocation.remaining_recipients, vec![RecipientAccount::new("rec2", 10)]);
/// ```
pub fn create_transfers(
    closing_account: &ClosingAccount,
    remaining_recipients: &[RecipientAccount],
) -> Allocation {
    let from = &closing_account.account_id;
    let mut surplus = closing_account.amount;
    let mut transfers = Vec::new();

    for (idx, recipient) in remaining_recipients.iter().enumerate() {
        if recipient.is_settled() {
            continue;
        }

        if surplus > recipient.credit {
            transfers.push(Transfer::payment(
                from.clone(),
                recipient.account_id.clone(),
                recipient.credit,
            ));
            surplus -= recipient.credit;
            continue;
        }

        // Surplus runs out on this recipient, possibly as a zero payment.
        transfers.push(Transfer::payment(
            from.clone(),
            recipient.account_id.clone(),
            surplus,
        ));
        let mut rest = Vec::with_capacity(remaining_recipients.len() - idx);
        let credit = recipient.credit - surplus;
        if credit > 0 {
            rest.push(recipient.with_credit(credit));
        }
        rest.extend(
            remaining_recipients[idx + 1..]
                .iter()
                .filter(|r| !r.is_settled())
                .cloned(),
        );

        return Allocation {
            closing_account: closing_account.with_amount(0),
            transfers,
            remaining_recipients: rest,
        };
    }

    Allocation {
        closing_account: closing_account.with_amount(surplus),
        transfers,
        remaining_recipients: Vec::new(),
    }
}
