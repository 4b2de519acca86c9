use common::{PaymentStatus, PeriodSummary};
use model::entities::{payment, rental};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{debug, error, instrument, trace};

use super::period::PeriodKey;
use crate::error::{ComputeError, Result};

/// Status rule shared by summaries and reporting.
///
/// `paid` is the evidence that money arrived, `remaining` what is still owed.
pub fn status_for(paid: Decimal, remaining: Decimal) -> PaymentStatus {
    if paid <= Decimal::ZERO {
        PaymentStatus::Unpaid
    } else if remaining <= Decimal::ZERO {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Partial
    }
}

/// `max(0, total_due - paid)`
pub fn remaining_after(total_due: Decimal, paid: Decimal) -> Decimal {
    (total_due - paid).max(Decimal::ZERO)
}

/// Summarizes the payments of one period key against the rent owed.
pub fn summarize_payments(payments: &[payment::Model], total_due: Decimal) -> PeriodSummary {
    let total_paid: Decimal = payments.iter().map(|p| p.amount).sum();
    let remaining_balance = remaining_after(total_due, total_paid);

    PeriodSummary {
        total_paid,
        total_due,
        remaining_balance,
        payment_count: payments.len() as u64,
        status: status_for(total_paid, remaining_balance),
    }
}

/// Orders payments the way balances accumulate: by date, then by id.
pub fn sort_for_running_balance(payments: &mut [payment::Model]) {
    payments.sort_by(|a, b| a.payment_date.cmp(&b.payment_date).then(a.id.cmp(&b.id)));
}

/// Snapshot each payment should carry, as `(payment id, amount_due)` in
/// running order.
pub fn running_snapshots(payments: &[payment::Model], total_due: Decimal) -> Vec<(i32, Decimal)> {
    let mut ordered = payments.to_vec();
    sort_for_running_balance(&mut ordered);

    let mut running = Decimal::ZERO;
    ordered
        .iter()
        .map(|p| {
            running += p.amount;
            (p.id, remaining_after(total_due, running))
        })
        .collect()
}

/// Checks stored snapshots against the running-balance law.
pub fn verify_running_balance(payments: &[payment::Model], total_due: Decimal) -> Result<()> {
    let expected = running_snapshots(payments, total_due);

    for (id, snapshot) in expected {
        let stored = payments
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.amount_due)
            .unwrap_or_default();

        if stored != snapshot {
            return Err(ComputeError::ConsistencyViolation(format!(
                "payment id={} stores amount_due={} but the running balance gives {}",
                id, stored, snapshot
            )));
        }
    }

    Ok(())
}

/// Loads every payment of a period key, oldest first.
#[instrument(skip(db), fields(key = %key))]
pub async fn find_period_payments<C: ConnectionTrait>(db: &C, key: &PeriodKey) -> Result<Vec<payment::Model>> {
    let payments = payment::Entity::find()
        .filter(payment::Column::TenantId.eq(key.tenant_id))
        .filter(payment::Column::RentalId.eq(key.rental_id))
        .filter(payment::Column::PeriodLabel.eq(key.period_label.as_str()))
        .order_by_asc(payment::Column::PaymentDate)
        .order_by_asc(payment::Column::Id)
        .all(db)
        .await?;

    trace!("Found {} payments for {}", payments.len(), key);
    Ok(payments)
}

/// Rent owed per period for a rental.
#[instrument(skip(db))]
pub async fn resolve_total_due<C: ConnectionTrait>(db: &C, rental_id: i32) -> Result<Decimal> {
    let rental = rental::Entity::find_by_id(rental_id)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found(format!("Rental with id {}", rental_id)))?;

    Ok(rental.monthly_rent_amount)
}

/// Read-only summary of a period key. Never writes.
#[instrument(skip(db), fields(key = %key, total_due = %total_due))]
pub async fn summarize<C: ConnectionTrait>(db: &C, key: &PeriodKey, total_due: Decimal) -> Result<PeriodSummary> {
    let payments = find_period_payments(db, key).await?;
    let summary = summarize_payments(&payments, total_due);

    debug!(
        "Summary for {}: paid={} remaining={} count={} status={}",
        key, summary.total_paid, summary.remaining_balance, summary.payment_count, summary.status
    );
    Ok(summary)
}

/// Rewrites `amount_due` of every payment of a key from its running balance,
/// then re-reads the key and verifies the result.
///
/// Only `amount_due` is written and only where it changed. Returns the number
/// of payments of the key. Callers hold the key's lock and pass a transaction
/// so a failed check leaves nothing behind.
#[instrument(skip(db), fields(key = %key, total_due = %total_due))]
pub async fn recompute_snapshots<C: ConnectionTrait>(db: &C, key: &PeriodKey, total_due: Decimal) -> Result<usize> {
    let payments = find_period_payments(db, key).await?;
    let snapshots = running_snapshots(&payments, total_due);

    let mut written = 0;
    for (id, snapshot) in &snapshots {
        let Some(current) = payments.iter().find(|p| p.id == *id) else {
            continue;
        };
        if current.amount_due == *snapshot {
            continue;
        }

        trace!(
            "Payment {} amount_due {} -> {}",
            current.payment_reference, current.amount_due, snapshot
        );
        let mut active: payment::ActiveModel = current.clone().into();
        active.amount_due = Set(*snapshot);
        active.update(db).await?;
        written += 1;
    }

    let stored = find_period_payments(db, key).await?;
    if let Err(e) = verify_running_balance(&stored, total_due) {
        error!("Snapshot check failed for {}: {}", key, e);
        return Err(e);
    }

    debug!("Recomputed {} payments for {} ({} rewritten)", snapshots.len(), key, written);
    Ok(snapshots.len())
}

/// Resolves the rent of the key's rental and recomputes its snapshots.
/// Fails with `NotFound` before writing anything when the rental is gone.
pub async fn recompute_key<C: ConnectionTrait>(db: &C, key: &PeriodKey) -> Result<usize> {
    let total_due = resolve_total_due(db, key.rental_id).await?;
    recompute_snapshots(db, key, total_due).await
}
