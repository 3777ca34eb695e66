//! The ledger store
//!
//! Holds the registered users and the append-only expense log behind a single
//! reader/writer lock. Writers validate and mutate under one exclusive hold,
//! so no reader ever sees a half-admitted expense.
//!
//! # Example
//!
//! ```
//! use splitledger_core::{Config, Ledger, User};
//!
//! # fn main() -> splitledger_core::Result<()> {
//! let ledger = Ledger::new(Config::default())?;
//! ledger.register_user(User::new("A", "Alice"))?;
//!
//! assert!(ledger.register_user(User::new("A", "Again")).is_err());
//! assert_eq!(ledger.user_count(), 1);
//! # Ok(())
//! # }
//! ```

use crate::{
    balance::compute_balances,
    metrics::Metrics,
    types::{Expense, User, UserBalance, UserId},
    validation::{validate_expense, validate_user},
    Config, Error, Result,
};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Users and expenses guarded together
#[derive(Debug, Default)]
struct LedgerState {
    /// Users in registration order
    users: Vec<User>,

    /// User ID -> position in `users`
    index: HashMap<UserId, usize>,

    /// Expenses in insertion order
    expenses: Vec<Expense>,
}

impl LedgerState {
    fn is_registered(&self, id: &UserId) -> bool {
        self.index.contains_key(id)
    }
}

/// In-memory expense ledger
#[derive(Debug)]
pub struct Ledger {
    state: RwLock<LedgerState>,

    /// Metrics (if enabled)
    metrics: Option<Metrics>,

    /// Configuration
    config: Config,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let metrics = if config.metrics.enabled {
            Some(Metrics::new(&config.metrics)?)
        } else {
            None
        };

        tracing::debug!(service = %config.service_name, "Ledger created");

        Ok(Self {
            state: RwLock::new(LedgerState::default()),
            metrics,
            config,
        })
    }

    /// Register a new user
    pub fn register_user(&self, user: User) -> Result<()> {
        validate_user(&user)?;

        let mut state = self.state.write();
        if state.is_registered(&user.id) {
            tracing::info!(user_id = %user.id, "Rejected duplicate user");
            return Err(Error::DuplicateUser(user.id));
        }

        let position = state.users.len();
        state.index.insert(user.id.clone(), position);
        tracing::info!(user_id = %user.id, name = %user.name, "User registered");
        state.users.push(user);
        drop(state);

        if let Some(metrics) = &self.metrics {
            metrics.record_user_registered();
        }
        Ok(())
    }

    /// Snapshot of all users, in registration order
    pub fn list_users(&self) -> Vec<User> {
        self.state.read().users.clone()
    }

    /// Look up one user
    pub fn get_user(&self, id: &UserId) -> Option<User> {
        let state = self.state.read();
        state.index.get(id).map(|&position| state.users[position].clone())
    }

    /// Number of registered users
    pub fn user_count(&self) -> usize {
        self.state.read().users.len()
    }

    /// Validate and append an expense
    ///
    /// Fails with `UnknownUser` or `AmountMismatch` without touching the log.
    pub fn append_expense(&self, expense: Expense) -> Result<()> {
        let mut state = self.state.write();

        let validation = validate_expense(
            &expense,
            |id| state.is_registered(id),
            self.config.amount_tolerance,
        );
        if let Err(err) = validation {
            drop(state);
            tracing::info!(expense_id = %expense.id, error = %err, "Rejected expense");
            if let Some(metrics) = &self.metrics {
                metrics.record_rejection(err.code());
            }
            return Err(err);
        }

        tracing::info!(
            expense_id = %expense.id,
            paid_by = %expense.paid_by,
            total = %expense.total_amount,
            splits = expense.splits.len(),
            "Expense recorded"
        );
        state.expenses.push(expense);

        // Still under the write lock: gauge matches the latest append
        if let Some(metrics) = &self.metrics {
            metrics.record_expense(state.expenses.len());
        }
        Ok(())
    }

    /// All expenses, in insertion order
    pub fn list_expenses(&self) -> Vec<Expense> {
        self.state.read().expenses.clone()
    }

    /// Number of recorded expenses
    pub fn expense_count(&self) -> usize {
        self.state.read().expenses.len()
    }

    /// Net balance of every user, derived from the full expense log
    ///
    /// Users and expenses are read under one lock hold, so the result always
    /// reflects a single committed state.
    pub fn balances(&self) -> Vec<UserBalance> {
        let balances = {
            let state = self.state.read();
            compute_balances(&state.users, &state.expenses, self.config.decimal_places)
        };

        tracing::debug!(users = balances.len(), "Balances computed");
        if let Some(metrics) = &self.metrics {
            metrics.record_balance_computation();
        }
        balances
    }

    /// Metrics (`None` when disabled)
    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
