use crate::core::account::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single entry of a rebalance plan.
///
/// `Payment` moves funds from a closing account to a recipient.
/// `Leftover` records surplus that had no recipient left to pay and is
/// therefore available to cover the operational fee.
///
/// # Examples
///
/// ```
/// use rebalance_engine::core::transfer::Transfer;
///
/// let payment = Transfer::payment("acc1", "rec1", 400);
/// let leftover = Transfer::leftover("acc1", 100);
///
/// assert_eq!(payment.to_account().map(|id| id.as_str()), Some("rec1"));
/// assert_eq!(leftover.to_account(), None);
/// assert!(leftover.is_leftover());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transfer {
    Payment {
        from: AccountId,
        to: AccountId,
        amount: u64,
    },
    Leftover {
        from: AccountId,
        amount: u64,
    },
}

impl Transfer {
    pub fn payment(from: impl Into<AccountId>, to: impl Into<AccountId>, amount: u64) -> Self {
        Transfer::Payment {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }

    pub fn leftover(from: impl Into<AccountId>, amount: u64) -> Self {
        Transfer::Leftover {
            from: from.into(),
            amount,
        }
    }

    pub fn from_account(&self) -> &AccountId {
        match self {
            Transfer::Payment { from, .. } | Transfer::Leftover { from, .. } => from,
        }
    }

    /// The receiving account, or `None` for a leftover entry.
    pub fn to_account(&self) -> Option<&AccountId> {
        match self {
            Transfer::Payment { to, .. } => Some(to),
            Transfer::Leftover { .. } => None,
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            Transfer::Payment { amount, .. } | Transfer::Leftover { amount, .. } => *amount,
        }
    }

    pub fn is_leftover(&self) -> bool {
        matches!(self, Transfer::Leftover { .. })
    }

    /// The same entry carrying `amount` instead.
    pub fn with_amount(&self, amount: u64) -> Self {
        match self {
            Transfer::Payment { from, to, .. } => Transfer::Payment {
                from: from.clone(),
                to: to.clone(),
                amount,
            },
            Transfer::Leftover { from, .. } => Transfer::Leftover {
                from: from.clone(),
                amount,
            },
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transfer::Payment { from, to, amount } => write!(f, "{} → {}: {}", from, to, amount),
            Transfer::Leftover { from, amount } => write!(f, "{} → (fee pool): {}", from, amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let t = Transfer::payment("acc1", "rec1", 400);
        assert_eq!(t.from_account().as_str(), "acc1");
        assert_eq!(t.amount(), 400);
        assert!(!t.is_leftover());
    }

    #[test]
    fn test_with_amount_preserves_variant() {
        let t = Transfer::leftover("acc2", 500).with_amount(470);
        assert_eq!(t, Transfer::leftover("acc2", 470));

        let p = Transfer::payment("acc1", "rec1", 10).with_amount(0);
        assert_eq!(p, Transfer::payment("acc1", "rec1", 0));
    }

    #[test]
    fn test_json_is_tagged() {
        let json = serde_json::to_value(Transfer::leftover("acc1", 100)).unwrap();
        assert_eq!(json["kind"], "leftover");
        assert_eq!(json["from"], "acc1");
        assert!(json.get("to").is_none());

        let json = serde_json::to_value(Transfer::payment("acc1", "rec1", 5)).unwrap();
        assert_eq!(json["kind"], "payment");
        assert_eq!(json["to"], "rec1");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Transfer::payment("acc1", "rec1", 400).to_string(),
            "acc1 → rec1: 400"
        );
        assert_eq!(
            Transfer::leftover("acc2", 470).to_string(),
            "acc2 → (fee pool): 470"
        );
    }
}
