//! Settlement Engine
//!
//! Reduces the web of debts recorded in a SplitLedger ledger to a short list
//! of point-to-point payments.
//!
//! # Architecture
//!
//! 1. **Ingestion**: Users and expenses enter through [`SettlementEngine`], which
//!    delegates validation and storage to the ledger
//! 2. **Balances**: Each query re-derives one signed balance per user from the raw log
//! 3. **Netting**: Debtors are greedily matched against creditors, largest first
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use splitledger_core::{Expense, Split, User};
//! use splitledger_settlement::{Config, SettlementEngine};
//!
//! # fn main() -> splitledger_settlement::Result<()> {
//! let engine = SettlementEngine::new(Config::default())?;
//! for id in ["A", "B", "C"] {
//!     engine.register_user(User::new(id, id))?;
//! }
//!
//! engine.record_expense(Expense::new(
//!     "e1",
//!     "Groceries",
//!     Decimal::from(90),
//!     "A",
//!     vec![
//!         Split::new("A", Decimal::from(30)),
//!         Split::new("B", Decimal::from(30)),
//!         Split::new("C", Decimal::from(30)),
//!     ],
//! ))?;
//!
//! let settlements = engine.compute_settlement();
//! assert_eq!(settlements.len(), 2);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod netting;
pub mod error;
pub mod config;
pub mod engine;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, NettingConfig};
pub use engine::SettlementEngine;
pub use netting::{apply_settlements, NettingEngine};
