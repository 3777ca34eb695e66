//! Balance netting
//!
//! Folds the full expense log into one signed balance per registered user.
//!
//! # Example
//!
//! ```text
//! Expense: A pays 90, split A 30 / B 30 / C 30
//!
//! A: +90 - 30 = +60  (creditor)
//! B:     - 30 = -30  (debtor)
//! C:     - 30 = -30  (debtor)
//! ```

use crate::types::{round_amount, Expense, User, UserBalance, UserId};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Compute the net balance of every user
///
/// Users who never took part in an expense get a zero balance. Output follows
/// the order of `users`. Rounding happens once per user, after all expenses
/// are summed.
///
/// Sums are checked. A log admitted through the ledger cannot leave the
/// `Decimal` range (see [`MAX_AMOUNT`](crate::validation::MAX_AMOUNT)); for any
/// other input an out-of-range sum saturates and is logged.
pub fn compute_balances(
    users: &[User],
    expenses: &[Expense],
    decimal_places: u32,
) -> Vec<UserBalance> {
    let mut net: HashMap<&UserId, Decimal> = users
        .iter()
        .map(|user| (&user.id, Decimal::ZERO))
        .collect();

    for expense in expenses {
        accumulate(
            net.entry(&expense.paid_by).or_insert(Decimal::ZERO),
            expense.total_amount,
            &expense.paid_by,
        );

        for split in &expense.splits {
            accumulate(
                net.entry(&split.user_id).or_insert(Decimal::ZERO),
                -split.amount,
                &split.user_id,
            );
        }
    }

    users
        .iter()
        .map(|user| UserBalance {
            user_id: user.id.clone(),
            name: user.name.clone(),
            amount: round_amount(net.get(&user.id).copied().unwrap_or_default(), decimal_places),
        })
        .collect()
}

fn accumulate(balance: &mut Decimal, delta: Decimal, user_id: &UserId) {
    *balance = match balance.checked_add(delta) {
        Some(sum) => sum,
        None => {
            tracing::error!(user_id = %user_id, "Balance out of range, saturating");
            balance.saturating_add(delta)
        }
    };
}

/// Sum of all balances; zero for a conserving ledger
pub fn net_total(balances: &[UserBalance]) -> Decimal {
    balances.iter().map(|b| b.amount).sum()
}
