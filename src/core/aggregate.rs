use crate::core::account::{ClosingAccount, RecipientAccount};
use thiserror::Error;

/// Errors arising from summing account balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("cannot total an empty account list")]
    Empty,
    #[error("account total exceeds u64::MAX")]
    Overflow,
}

/// Sum a chosen field across a non-empty sequence of accounts.
///
/// # Examples
///
/// ```
/// use rebalance_engine::core::account::RecipientAccount;
/// use rebalance_engine::core::aggregate::total_of;
///
/// let recipients = vec![
///     RecipientAccount::new("rec1", 10),
///     RecipientAccount::new("rec2", 15),
/// ];
/// assert_eq!(total_of(&recipients, |r| r.credit).unwrap(), 25);
/// ```
pub fn total_of<T>(accounts: &[T], selector: impl Fn(&T) -> u64) -> Result<u64, AggregateError> {
    if accounts.is_empty() {
        return Err(AggregateError::Empty);
    }
    accounts
        .iter()
        .map(selector)
        .try_fold(0u64, |acc, value| acc.checked_add(value))
        .ok_or(AggregateError::Overflow)
}

/// Total surplus held by the closing accounts.
pub fn total_amount(closing_accounts: &[ClosingAccount]) -> Result<u64, AggregateError> {
    total_of(closing_accounts, |a| a.amount)
}

/// Total credit owed to the recipient accounts.
pub fn total_credit(recipient_accounts: &[RecipientAccount]) -> Result<u64, AggregateError> {
    total_of(recipient_accounts, |r| r.credit)
}
