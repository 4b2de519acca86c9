use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Dashboard totals over a set of payments.
///
/// `total_amount_due` is the outstanding amount across distinct
/// tenant/rental/period combinations, taken from the latest payment of each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentStatistics {
    pub total_payments: u64,
    pub total_amount_paid: Decimal,
    pub total_amount_due: Decimal,
    pub paid_count: u64,
    pub partial_count: u64,
    pub unpaid_count: u64,
    /// `paid_count / total_payments * 100`, one decimal place
    pub completion_rate: Decimal,
    /// Payments dated between the first of the current month and today
    pub this_month_payments: u64,
}

impl PaymentStatistics {
    /// Statistics for an empty payment set.
    pub fn empty() -> Self {
        Self {
            total_payments: 0,
            total_amount_paid: Decimal::ZERO,
            total_amount_due: Decimal::ZERO,
            paid_count: 0,
            partial_count: 0,
            unpaid_count: 0,
            completion_rate: Decimal::ZERO,
            this_month_payments: 0,
        }
    }
}
