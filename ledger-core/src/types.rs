//! Core types for the ledger
//!
//! All types are designed for:
//! - Plain-value snapshots (everything handed out of the ledger is an owned clone)
//! - JSON-friendly serialization (serde)
//! - Exact arithmetic (Decimal for money)

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Round a money amount to `decimal_places`, half away from zero.
///
/// `-10.005` becomes `-10.01` and `0.125` becomes `0.13` at two places.
pub fn round_amount(amount: Decimal, decimal_places: u32) -> Decimal {
    amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// User identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create new user ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Expense identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Create new expense ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExpenseId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ExpenseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A participant in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: UserId,

    /// Display name
    pub name: String,
}

impl User {
    /// Create new user
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The share of one expense owed by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// User who owes this share
    pub user_id: UserId,

    /// Amount owed
    pub amount: Decimal,
}

impl Split {
    /// Create new split
    pub fn new(user_id: impl Into<UserId>, amount: Decimal) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
        }
    }
}

/// A shared cost paid by one user and split across participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID
    pub id: ExpenseId,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Total amount paid
    pub total_amount: Decimal,

    /// User who paid
    pub paid_by: UserId,

    /// Breakdown of who owes what
    pub splits: Vec<Split>,
}

impl Expense {
    /// Create new expense
    pub fn new(
        id: impl Into<ExpenseId>,
        description: impl Into<String>,
        total_amount: Decimal,
        paid_by: impl Into<UserId>,
        splits: Vec<Split>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            total_amount,
            paid_by: paid_by.into(),
            splits,
        }
    }

    /// Sum of all split amounts
    pub fn split_sum(&self) -> Decimal {
        self.splits.iter().map(|s| s.amount).sum()
    }

    /// Every user the expense references, payer first
    pub fn participants(&self) -> impl Iterator<Item = &UserId> {
        std::iter::once(&self.paid_by).chain(self.splits.iter().map(|s| &s.user_id))
    }
}

/// Net position of a user (derived, never stored)
///
/// Positive means the user is owed money, negative means they owe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    /// User ID
    pub user_id: UserId,

    /// Display name
    pub name: String,

    /// Signed net balance
    #[serde(rename = "balance")]
    pub amount: Decimal,
}

impl UserBalance {
    /// Owes more than `threshold`
    pub fn is_debtor(&self, threshold: Decimal) -> bool {
        self.amount < -threshold
    }

    /// Is owed more than `threshold`
    pub fn is_creditor(&self, threshold: Decimal) -> bool {
        self.amount > threshold
    }
}
