//! Metrics collection for observability
//!
//! Prometheus metrics for monitoring the ledger. Each ledger owns its own
//! registry, so independent ledgers (one per test, say) never collide on
//! metric names.
//!
//! # Metrics
//!
//! - `users_registered_total` - Users accepted by the ledger
//! - `expenses_recorded_total` - Expenses accepted by the ledger
//! - `expenses_rejected_total{reason}` - Expenses refused, by error code
//! - `balance_computations_total` - Balance derivations served
//! - `expenses` - Current length of the expense log

use crate::config::MetricsConfig;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::fmt;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Users registered
    pub users_registered: IntCounter,

    /// Expenses recorded
    pub expenses_recorded: IntCounter,

    /// Expenses rejected, labelled by reason
    pub expenses_rejected: IntCounterVec,

    /// Balance computations
    pub balance_computations: IntCounter,

    /// Expense log length
    pub expenses: IntGauge,

    /// Prometheus registry
    pub registry: Registry,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new(config: &MetricsConfig) -> prometheus::Result<Self> {
        let registry = Registry::new();
        let opts = |name: &str, help: &str| Opts::new(name, help).namespace(config.namespace.clone());

        let users_registered =
            IntCounter::with_opts(opts("users_registered_total", "Users registered"))?;
        registry.register(Box::new(users_registered.clone()))?;

        let expenses_recorded =
            IntCounter::with_opts(opts("expenses_recorded_total", "Expenses recorded"))?;
        registry.register(Box::new(expenses_recorded.clone()))?;

        let expenses_rejected = IntCounterVec::new(
            opts("expenses_rejected_total", "Expenses rejected by validation"),
            &["reason"],
        )?;
        registry.register(Box::new(expenses_rejected.clone()))?;

        let balance_computations = IntCounter::with_opts(opts(
            "balance_computations_total",
            "Balance computations served",
        ))?;
        registry.register(Box::new(balance_computations.clone()))?;

        let expenses = IntGauge::with_opts(opts("expenses", "Expenses in the ledger"))?;
        registry.register(Box::new(expenses.clone()))?;

        Ok(Self {
            users_registered,
            expenses_recorded,
            expenses_rejected,
            balance_computations,
            expenses,
            registry,
        })
    }

    /// Record an accepted registration
    pub fn record_user_registered(&self) {
        self.users_registered.inc();
    }

    /// Record an accepted expense
    pub fn record_expense(&self, log_len: usize) {
        self.expenses_recorded.inc();
        self.expenses.set(log_len as i64);
    }

    /// Record a rejected expense
    pub fn record_rejection(&self, reason: &str) {
        self.expenses_rejected.with_label_values(&[reason]).inc();
    }

    /// Record a balance computation
    pub fn record_balance_computation(&self) {
        self.balance_computations.inc();
    }

    /// Render all metrics in the Prometheus text format
    pub fn gather_text(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("users_registered", &self.users_registered.get())
            .field("expenses_recorded", &self.expenses_recorded.get())
            .field("expenses", &self.expenses.get())
            .finish_non_exhaustive()
    }
}
