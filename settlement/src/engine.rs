//! Main settlement engine
//!
//! The synchronous service surface a transport calls into: register users,
//! record expenses, and query balances and settlements. Every query is
//! re-derived from the ledger's raw expense log.

use crate::{
    config::Config,
    netting::NettingEngine,
    types::{Settlement, SettlementPlan},
    Result,
};
use splitledger_core::{Expense, Ledger, User, UserBalance};
use std::sync::Arc;

/// Settlement engine
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    /// Ledger core
    ledger: Arc<Ledger>,

    /// Netting engine
    netting: NettingEngine,

    /// Configuration
    config: Config,
}

impl SettlementEngine {
    /// Create new settlement engine over a fresh ledger
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let ledger = Arc::new(Ledger::new(config.ledger.clone())?);
        Ok(Self::with_ledger(ledger, config))
    }

    /// Create settlement engine over an existing ledger
    ///
    /// `config.ledger` is ignored; the ledger keeps its own configuration.
    pub fn with_ledger(ledger: Arc<Ledger>, config: Config) -> Self {
        let netting = NettingEngine::new(&config.netting);
        tracing::info!(service = %config.service_name, "Settlement engine ready");
        Self {
            ledger,
            netting,
            config,
        }
    }

    /// Register a user; returns the stored user
    pub fn register_user(&self, user: User) -> Result<User> {
        self.ledger.register_user(user.clone())?;
        Ok(user)
    }

    /// Record an expense; returns the stored expense
    pub fn record_expense(&self, expense: Expense) -> Result<Expense> {
        self.ledger.append_expense(expense.clone())?;
        Ok(expense)
    }

    /// All users, in registration order
    pub fn list_users(&self) -> Vec<User> {
        self.ledger.list_users()
    }

    /// All expenses, in insertion order
    pub fn list_expenses(&self) -> Vec<Expense> {
        self.ledger.list_expenses()
    }

    /// Net balance of every user
    pub fn compute_balances(&self) -> Vec<UserBalance> {
        self.ledger.balances()
    }

    /// Payments that would clear every balance
    pub fn compute_settlement(&self) -> Vec<Settlement> {
        self.settlement_plan().settlements
    }

    /// Payments plus netting statistics
    pub fn settlement_plan(&self) -> SettlementPlan {
        let balances = self.compute_balances();
        let plan = self.netting.plan(&balances);

        tracing::info!(
            users = balances.len(),
            transfers = plan.stats.transfer_count,
            total = %plan.stats.total_transferred,
            "Settlement computed"
        );

        plan
    }

    /// Underlying ledger
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
