use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an account taking part in a rebalance.
///
/// # Examples
///
/// ```
/// use rebalance_engine::core::account::AccountId;
///
/// let a = AccountId::new("acc1");
/// let b = AccountId::new("rec1");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this account ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An account holding surplus funds that is drained during a rebalance.
///
/// Values are never mutated in place: draining produces a new
/// `ClosingAccount` carrying the reduced surplus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingAccount {
    pub account_id: AccountId,
    /// Surplus still available to allocate.
    pub amount: u64,
}

impl ClosingAccount {
    pub fn new(account_id: impl Into<AccountId>, amount: u64) -> Self {
        Self {
            account_id: account_id.into(),
            amount,
        }
    }

    /// A copy of this account with `amount` as its remaining surplus.
    pub fn with_amount(&self, amount: u64) -> Self {
        Self {
            account_id: self.account_id.clone(),
            amount,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.amount == 0
    }
}

/// An account that is owed `credit` and must be paid during a rebalance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientAccount {
    pub account_id: AccountId,
    /// Amount still owed.
    pub credit: u64,
}

impl RecipientAccount {
    pub fn new(account_id: impl Into<AccountId>, credit: u64) -> Self {
        Self {
            account_id: account_id.into(),
            credit,
        }
    }

    /// A copy of this account with `credit` as the amount still owed.
    pub fn with_credit(&self, credit: u64) -> Self {
        Self {
            account_id: self.account_id.clone(),
            credit,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.credit == 0
    }
}
