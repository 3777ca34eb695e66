//! Debt settlement by greedy matching
//!
//! Turns per-user net balances into a short list of point-to-point payments.
//!
//! # Algorithm
//!
//! 1. Round every balance and split users into debtors and creditors
//! 2. Match the largest debtor with the largest creditor
//! 3. Transfer min(debt, credit) and drop whoever reaches zero
//! 4. Repeat until one side is empty
//!
//! This is the classic greedy heuristic. It never needs more than
//! `debtors + creditors - 1` payments, but it does not search for zero-sum
//! subgroups, so it is not guaranteed to reach the true minimum payment count
//! (that problem is NP-hard).
//!
//! # Example
//!
//! ```text
//! Net positions:
//!   A: +60 (creditor)
//!   B: -30 (debtor)
//!   C: -30 (debtor)
//!
//! Payments:
//!   B pays A: 30
//!   C pays A: 30
//! ```
//!
//! Ties between equal balances go to the party that appears first in the
//! input, which for ledger balances is registration order.

use crate::{
    config::NettingConfig,
    types::{NettingStats, Settlement, SettlementPlan},
};
use rust_decimal::Decimal;
use splitledger_core::{round_amount, UserBalance, UserId};
use std::collections::HashMap;

/// A debtor or creditor still in play
#[derive(Debug)]
struct Party {
    user_id: UserId,

    /// Signed remaining balance
    balance: Decimal,

    /// Position in the input, for tie-breaking
    rank: usize,
}

/// Netting engine
#[derive(Debug, Clone)]
pub struct NettingEngine {
    /// Balances within ±threshold are settled
    settled_threshold: Decimal,

    /// Rounding precision
    decimal_places: u32,
}

impl Default for NettingEngine {
    fn default() -> Self {
        Self::new(&NettingConfig::default())
    }
}

impl NettingEngine {
    /// Create new netting engine
    pub fn new(config: &NettingConfig) -> Self {
        Self {
            settled_threshold: config.settled_threshold,
            decimal_places: config.decimal_places,
        }
    }

    /// Payments that clear the given balances
    pub fn compute_settlements(&self, balances: &[UserBalance]) -> Vec<Settlement> {
        self.plan(balances).settlements
    }

    /// Payments that clear the given balances, with statistics
    pub fn plan(&self, balances: &[UserBalance]) -> SettlementPlan {
        let (mut debtors, mut creditors) = self.partition(balances);

        let mut stats = NettingStats {
            debtor_count: debtors.len(),
            creditor_count: creditors.len(),
            gross_debt: debtors.iter().map(|d| -d.balance).sum(),
            ..NettingStats::default()
        };

        let mut settlements = Vec::new();

        while !debtors.is_empty() && !creditors.is_empty() {
            // Most negative debtor and most positive creditor first
            debtors.sort_by(|a, b| a.balance.cmp(&b.balance).then(a.rank.cmp(&b.rank)));
            creditors.sort_by(|a, b| b.balance.cmp(&a.balance).then(a.rank.cmp(&b.rank)));

            let debtor = &mut debtors[0];
            let creditor = &mut creditors[0];

            let payment = round_amount(
                debtor.balance.abs().min(creditor.balance),
                self.decimal_places,
            );
            if payment <= Decimal::ZERO {
                break;
            }

            tracing::debug!(
                from = %debtor.user_id,
                to = %creditor.user_id,
                amount = %payment,
                "Matched payment"
            );

            settlements.push(Settlement {
                from: debtor.user_id.clone(),
                to: creditor.user_id.clone(),
                amount: payment,
            });

            debtor.balance += payment;
            creditor.balance -= payment;

            let debtor_done = self.is_settled(debtor.balance);
            let creditor_done = self.is_settled(creditor.balance);
            if debtor_done {
                debtors.swap_remove(0);
            }
            if creditor_done {
                creditors.swap_remove(0);
            }
        }

        stats.transfer_count = settlements.len();
        stats.total_transferred = settlements.iter().map(|s| s.amount).sum();
        stats.residual = debtors
            .iter()
            .chain(creditors.iter())
            .map(|p| p.balance.abs())
            .sum();

        if !stats.residual.is_zero() {
            tracing::warn!(residual = %stats.residual, "Balances left partly unmatched");
        }

        SettlementPlan { settlements, stats }
    }

    /// Split rounded balances into (debtors, creditors)
    fn partition(&self, balances: &[UserBalance]) -> (Vec<Party>, Vec<Party>) {
        let mut debtors = Vec::new();
        let mut creditors = Vec::new();

        for (rank, entry) in balances.iter().enumerate() {
            let balance = round_amount(entry.amount, self.decimal_places);
            let party = Party {
                user_id: entry.user_id.clone(),
                balance,
                rank,
            };

            if balance < -self.settled_threshold {
                debtors.push(party);
            } else if balance > self.settled_threshold {
                creditors.push(party);
            }
        }

        (debtors, creditors)
    }

    /// Close enough to zero to leave the matching
    fn is_settled(&self, balance: Decimal) -> bool {
        balance.is_zero() || balance.abs() < self.settled_threshold
    }
}

/// Apply payments to balances
///
/// Each payment raises the payer's balance and lowers the receiver's by its
/// amount. Applying a full plan to the balances it was built from leaves every
/// balance at (or within the settled threshold of) zero.
pub fn apply_settlements(balances: &[UserBalance], settlements: &[Settlement]) -> Vec<UserBalance> {
    let mut result = balances.to_vec();
    let position: HashMap<UserId, usize> = result
        .iter()
        .enumerate()
        .map(|(i, b)| (b.user_id.clone(), i))
        .collect();

    for settlement in settlements {
        if let Some(&from) = position.get(&settlement.from) {
            result[from].amount += settlement.amount;
        }
        if let Some(&to) = position.get(&settlement.to) {
            result[to].amount -= settlement.amount;
        }
    }

    result
}
