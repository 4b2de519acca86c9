//! Payment balance engine.
//!
//! Payments are grouped by [`PeriodKey`] (tenant, rental, `YYYY-MM` label).
//! Every payment carries an `amount_due` snapshot: the balance left for its
//! period once it and all earlier payments of the same key are applied.
//! Mutations go through [`ledger::PaymentLedger`], which serializes writers
//! per key and recomputes the key's snapshots in the same transaction.

pub mod balance;
pub mod ledger;
pub mod locks;
pub mod outstanding;
pub mod period;
pub mod query;
pub mod reference;
pub mod validation;

#[cfg(test)]
pub mod testing;

pub use balance::{recompute_snapshots, summarize, summarize_payments};
pub use outstanding::{aggregate_outstanding, payment_statistics, OutstandingTotals};
pub use period::PeriodKey;
