//! Core types for settlement engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitledger_core::UserId;

/// One suggested payment between two users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// User who pays
    pub from: UserId,

    /// User who receives
    pub to: UserId,

    /// Amount to transfer (always positive)
    pub amount: Decimal,
}

/// Settlement result with netting statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Payments, in the order they were matched
    pub settlements: Vec<Settlement>,

    /// Statistics
    pub stats: NettingStats,
}

impl SettlementPlan {
    /// No payments needed
    pub fn is_settled(&self) -> bool {
        self.settlements.is_empty()
    }
}

/// Netting statistics
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NettingStats {
    /// Users owing more than the settled threshold
    pub debtor_count: usize,

    /// Users owed more than the settled threshold
    pub creditor_count: usize,

    /// Number of payments emitted
    pub transfer_count: usize,

    /// Sum of all payments
    pub total_transferred: Decimal,

    /// Sum of all debts before matching
    pub gross_debt: Decimal,

    /// Absolute balance left unmatched (rounding leftovers)
    pub residual: Decimal,
}

impl NettingStats {
    /// Upper bound on payments for this many parties
    pub fn max_transfers(&self) -> usize {
        (self.debtor_count + self.creditor_count).saturating_sub(1)
    }
}
