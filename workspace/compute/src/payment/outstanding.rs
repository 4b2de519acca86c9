use chrono::{Datelike, NaiveDate};
use common::{PaymentStatistics, PaymentStatus};
use model::entities::payment;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::balance::status_for;
use super::period::PeriodKey;
use super::reference::reference_number;

/// Outstanding totals over the latest snapshot of every period key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutstandingTotals {
    pub total_outstanding: Decimal,
    pub paid_count: u64,
    pub partial_count: u64,
    pub unpaid_count: u64,
}

/// Newer payments compare greater: later date first, then the higher
/// reference number.
fn recency(a: &payment::Model, b: &payment::Model) -> Ordering {
    a.payment_date
        .cmp(&b.payment_date)
        .then_with(|| {
            match (
                reference_number(&a.payment_reference),
                reference_number(&b.payment_reference),
            ) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => a.payment_reference.cmp(&b.payment_reference),
            }
        })
}

/// Most recent payment of every period key.
pub fn representatives(records: &[payment::Model]) -> HashMap<PeriodKey, &payment::Model> {
    let mut latest: HashMap<PeriodKey, &payment::Model> = HashMap::new();

    for record in records {
        latest
            .entry(PeriodKey::of(record))
            .and_modify(|current| {
                if recency(record, current) == Ordering::Greater {
                    *current = record;
                }
            })
            .or_insert(record);
    }

    latest
}

/// Sums what is still owed without counting a period key twice.
///
/// Only the most recent payment of each key contributes, so a key paid off
/// over several payments adds nothing and still counts as paid.
pub fn aggregate_outstanding(records: &[payment::Model]) -> OutstandingTotals {
    let mut totals = OutstandingTotals::default();

    for representative in representatives(records).values() {
        if representative.amount_due > Decimal::ZERO {
            totals.total_outstanding += representative.amount_due;
        }

        match status_for(representative.amount, representative.amount_due) {
            PaymentStatus::Paid => totals.paid_count += 1,
            PaymentStatus::Partial => totals.partial_count += 1,
            PaymentStatus::Unpaid => totals.unpaid_count += 1,
        }
    }

    totals
}

/// Dashboard statistics over a listed set of payments.
pub fn payment_statistics(records: &[payment::Model], today: NaiveDate) -> PaymentStatistics {
    if records.is_empty() {
        return PaymentStatistics::empty();
    }

    let outstanding = aggregate_outstanding(records);
    let total_payments = records.len() as u64;

    let month_start = today.with_day(1).unwrap_or(today);
    let this_month_payments = records
        .iter()
        .filter(|p| p.payment_date >= month_start && p.payment_date <= today)
        .count() as u64;

    let completion_rate =
        (Decimal::from(outstanding.paid_count) * Decimal::ONE_HUNDRED / Decimal::from(total_payments)).round_dp(1);

    PaymentStatistics {
        total_payments,
        total_amount_paid: records.iter().map(|p| p.amount).sum(),
        total_amount_due: outstanding.total_outstanding,
        paid_count: outstanding.paid_count,
        partial_count: outstanding.partial_count,
        unpaid_count: outstanding.unpaid_count,
        completion_rate,
        this_month_payments,
    }
}
