pub mod error;
pub mod payment;

pub use payment::ledger::{NewPayment, PaymentChanges, PaymentLedger};
pub use payment::period::PeriodKey;
