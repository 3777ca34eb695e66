//! Admission checks for users and expenses
//!
//! Pure functions over borrowed data. The ledger calls them while it holds the
//! write lock, so a check and the append that follows it see the same user set.

use crate::{
    types::{Expense, User, UserId},
    Error, Result,
};
use rust_decimal::Decimal;

/// Largest accepted magnitude for an expense total or a split amount (10^15)
///
/// Every running per-user sum over an admitted log stays far inside the
/// `Decimal` range, so balance folding never overflows.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x38D7E, 0, false, 0);

fn check_range(amount: Decimal, what: &str) -> Result<()> {
    if amount.abs() > MAX_AMOUNT {
        return Err(Error::InvalidInput(format!(
            "{} {} exceeds the maximum of {}",
            what, amount, MAX_AMOUNT
        )));
    }
    Ok(())
}

/// Reject users with a blank id or name
pub fn validate_user(user: &User) -> Result<()> {
    if user.id.is_blank() {
        return Err(Error::InvalidInput("User ID is required".to_string()));
    }
    if user.name.trim().is_empty() {
        return Err(Error::InvalidInput(format!(
            "Name is required for user {}",
            user.id
        )));
    }
    Ok(())
}

/// Check an expense against the registered user set and the amount tolerance
///
/// Checks run in a fixed order and the first failure wins: blank expense id,
/// total out of range, unknown payer, then per split (in split order) unknown
/// participant or amount out of range, and finally amount mismatch.
pub fn validate_expense<F>(expense: &Expense, is_registered: F, tolerance: Decimal) -> Result<()>
where
    F: Fn(&UserId) -> bool,
{
    if expense.id.is_blank() {
        return Err(Error::InvalidInput("Expense ID is required".to_string()));
    }

    check_range(expense.total_amount, "Total amount")?;

    if !is_registered(&expense.paid_by) {
        return Err(Error::UnknownUser(expense.paid_by.clone()));
    }

    let mut split_sum = Decimal::ZERO;
    for split in &expense.splits {
        if !is_registered(&split.user_id) {
            return Err(Error::UnknownUser(split.user_id.clone()));
        }
        check_range(split.amount, "Split amount")?;
        split_sum = split_sum.checked_add(split.amount).ok_or_else(|| {
            Error::InvalidInput(format!("Split amounts of expense {} overflow", expense.id))
        })?;
    }

    let difference = expense.total_amount.checked_sub(split_sum).ok_or_else(|| {
        Error::InvalidInput(format!("Amounts of expense {} overflow", expense.id))
    })?;
    if difference.abs() > tolerance {
        return Err(Error::AmountMismatch {
            total: expense.total_amount,
            split_sum,
        });
    }

    Ok(())
}
