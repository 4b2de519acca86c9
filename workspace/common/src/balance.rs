use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Payment status of one tenant/rental/period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// Nothing is owed any more and at least one payment was made.
    Paid,
    /// Some money was paid but a balance remains.
    Partial,
    /// No money was paid.
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Partial => "PARTIAL",
            PaymentStatus::Unpaid => "UNPAID",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Balance of one tenant/rental/period, computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PeriodSummary {
    /// Sum of all payments in the period
    pub total_paid: Decimal,
    /// Rent owed for the period
    pub total_due: Decimal,
    /// What is still owed, never negative
    pub remaining_balance: Decimal,
    /// Number of payments in the period
    pub payment_count: u64,
    pub status: PaymentStatus,
}

/// A single payment together with the balance of its period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentDetail {
    pub payment_reference: String,
    pub tenant_name: String,
    pub property_name: String,
    pub rental_number: String,
    /// Amount paid in this payment
    pub amount: Decimal,
    /// Balance left right after this payment
    pub amount_due: Decimal,
    /// Balance left for the whole period
    pub remaining_balance: Decimal,
    /// Sum of all payments in the period
    pub total_paid: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub period_label: String,
}

/// Pre-fill data for entering a new payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentInfo {
    /// Period the payment date falls into (YYYY-MM)
    pub period_label: String,
    /// What is still owed for that period
    pub remaining_balance: Decimal,
    pub total_paid: Decimal,
    pub payment_count: u64,
    pub status: PaymentStatus,
    pub monthly_rent: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&PaymentStatus::Paid).unwrap(), "\"PAID\"");
        assert_eq!(serde_json::to_string(&PaymentStatus::Partial).unwrap(), "\"PARTIAL\"");
        assert_eq!(serde_json::to_string(&PaymentStatus::Unpaid).unwrap(), "\"UNPAID\"");

        let parsed: PaymentStatus = serde_json::from_str("\"PARTIAL\"").unwrap();
        assert_eq!(parsed, PaymentStatus::Partial);
    }

    #[test]
    fn test_period_summary_json_fields() {
        let summary = PeriodSummary {
            total_paid: Decimal::new(200_000, 0),
            total_due: Decimal::new(800_000, 0),
            remaining_balance: Decimal::new(600_000, 0),
            payment_count: 1,
            status: PaymentStatus::Partial,
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["total_paid"], "200000");
        assert_eq!(value["remaining_balance"], "600000");
        assert_eq!(value["payment_count"], 1);
        assert_eq!(value["status"], "PARTIAL");
    }
}
