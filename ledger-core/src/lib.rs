//! SplitLedger Core
//!
//! In-memory ledger of users and shared expenses, with on-demand balance netting.
//!
//! # Architecture
//!
//! - **Append-only**: Expenses are validated once, then never modified or removed
//! - **Single source of truth**: Balances are re-derived from the raw expense log on every query
//! - **Reader/writer lock**: Queries run concurrently, writes validate and append under one exclusive hold
//! - **Exact money**: All amounts are `Decimal`, rounded half-away-from-zero to 2 places
//!
//! # Invariants
//!
//! - Referential integrity: every payer and split participant is a registered user
//! - Amount consistency: |total - Σ(splits)| <= tolerance for every accepted expense
//! - Bounded amounts: every total and split is within ±[`MAX_AMOUNT`], so balances never overflow
//! - Conservation: Σ(balances) == 0 (within tolerance) for exact splits
//!
//! # Example
//!
//! ```
//! use splitledger_core::{Config, Expense, Ledger, Split, User};
//! use rust_decimal::Decimal;
//!
//! # fn main() -> splitledger_core::Result<()> {
//! let ledger = Ledger::new(Config::default())?;
//! ledger.register_user(User::new("alice", "Alice"))?;
//! ledger.register_user(User::new("bob", "Bob"))?;
//!
//! ledger.append_expense(Expense::new(
//!     "dinner",
//!     "Dinner",
//!     Decimal::new(4000, 2),
//!     "alice",
//!     vec![
//!         Split::new("alice", Decimal::new(2000, 2)),
//!         Split::new("bob", Decimal::new(2000, 2)),
//!     ],
//! ))?;
//!
//! let balances = ledger.balances();
//! assert_eq!(balances[1].amount, Decimal::new(-2000, 2));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    unused_qualifications,
    clippy::all
)]

pub mod types;
pub mod validation;
pub mod balance;
pub mod ledger;
pub mod error;
pub mod config;
pub mod metrics;

// Re-exports
pub use error::{Error, Result};
pub use types::{round_amount, Expense, ExpenseId, Split, User, UserBalance, UserId};
pub use ledger::Ledger;
pub use validation::MAX_AMOUNT;
pub use config::Config;
pub use metrics::Metrics;
