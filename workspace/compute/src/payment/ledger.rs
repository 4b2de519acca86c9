use chrono::NaiveDate;
use model::entities::{payment, tenant};
use model::entities::payment::PaymentMethod;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait};
use std::collections::BTreeSet;
use tracing::{debug, error, info, instrument, warn};

use super::balance::{recompute_key, recompute_snapshots, resolve_total_due};
use super::locks::PeriodLocks;
use super::period::{date_in_period, parse_period_label, period_label_for, PeriodKey};
use super::query::find_by_reference;
use super::reference::next_reference;
use super::validation::validate_amount;
use crate::error::{ComputeError, Result};

/// Input for recording a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub tenant_id: i32,
    pub rental_id: i32,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    /// Defaults to the month of `payment_date`.
    pub period_label: Option<String>,
}

/// Editable fields of a stored payment. Tenant, rental and period stay fixed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentChanges {
    pub amount: Option<Decimal>,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
}

impl PaymentChanges {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.payment_date.is_none() && self.payment_method.is_none()
    }
}

/// Writes payments and keeps the snapshots of their period key current.
///
/// Every mutation takes the key's lock, then runs the write, the recompute
/// and the consistency check in one database transaction.
#[derive(Debug, Clone)]
pub struct PaymentLedger {
    db: DatabaseConnection,
    locks: PeriodLocks,
}

fn log_failure(operation: &str, key: &PeriodKey, err: &ComputeError) {
    match err {
        ComputeError::ConsistencyViolation(_) => {
            error!("{} for {} rolled back: {}", operation, key, err)
        }
        ComputeError::NotFound(_) | ComputeError::Validation(_) => {
            warn!("{} for {} rejected: {}", operation, key, err)
        }
        ComputeError::Database(_) => error!("{} for {} failed: {}", operation, key, err),
    }
}

impl PaymentLedger {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            locks: PeriodLocks::new(),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Records a payment, assigns its reference and recomputes its key.
    #[instrument(skip(self, new), fields(tenant_id = new.tenant_id, rental_id = new.rental_id, amount = %new.amount))]
    pub async fn create_payment(&self, new: NewPayment) -> Result<payment::Model> {
        validate_amount(new.amount)?;
        let period_label = match new.period_label {
            Some(label) => {
                parse_period_label(&label)?;
                label
            }
            None => period_label_for(new.payment_date),
        };
        let key = PeriodKey::new(new.tenant_id, new.rental_id, period_label);

        let _guard = self.locks.acquire(&key).await;
        let result = self.create_locked(&key, new.amount, new.payment_date, new.payment_method).await;

        match &result {
            Ok(created) => info!(
                "Recorded payment {} of {} for {}",
                created.payment_reference, created.amount, key
            ),
            Err(e) => log_failure("Create", &key, e),
        }
        result
    }

    async fn create_locked(
        &self,
        key: &PeriodKey,
        amount: Decimal,
        payment_date: NaiveDate,
        payment_method: PaymentMethod,
    ) -> Result<payment::Model> {
        let txn = self.db.begin().await?;

        tenant::Entity::find_by_id(key.tenant_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ComputeError::not_found(format!("Tenant with id {}", key.tenant_id)))?;
        let total_due = resolve_total_due(&txn, key.rental_id).await?;

        let payment_reference = next_reference(&txn).await?;
        let inserted = payment::ActiveModel {
            payment_reference: Set(payment_reference),
            tenant_id: Set(key.tenant_id),
            rental_id: Set(key.rental_id),
            amount: Set(amount),
            amount_due: Set(total_due),
            payment_date: Set(payment_date),
            payment_method: Set(payment_method),
            period_label: Set(key.period_label.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        recompute_snapshots(&txn, key, total_due).await?;

        let stored = payment::Entity::find_by_id(inserted.id)
            .one(&txn)
            .await?
            .ok_or_else(|| ComputeError::not_found(format!("Payment {}", inserted.payment_reference)))?;

        txn.commit().await?;
        Ok(stored)
    }

    /// Applies `changes` to a stored payment and recomputes its key.
    ///
    /// The period label is pinned; moving the date outside its month is
    /// allowed and only logged.
    #[instrument(skip(self, changes))]
    pub async fn update_payment(&self, reference: &str, changes: PaymentChanges) -> Result<payment::Model> {
        if let Some(amount) = changes.amount {
            validate_amount(amount)?;
        }

        let existing = find_by_reference(&self.db, reference).await?;
        let key = PeriodKey::of(&existing);

        let _guard = self.locks.acquire(&key).await;
        let result = self.update_locked(&key, reference, changes).await;

        match &result {
            Ok(updated) => info!("Updated payment {} for {}", updated.payment_reference, key),
            Err(e) => log_failure("Update", &key, e),
        }
        result
    }

    async fn update_locked(&self, key: &PeriodKey, reference: &str, changes: PaymentChanges) -> Result<payment::Model> {
        let txn = self.db.begin().await?;

        // Re-read under the lock, a concurrent delete may have won
        let existing = find_by_reference(&txn, reference).await?;

        if changes.is_empty() {
            debug!("No changes for payment {}", reference);
            txn.commit().await?;
            return Ok(existing);
        }

        if let Some(date) = changes.payment_date {
            if !date_in_period(date, &existing.period_label) {
                warn!(
                    "Payment {} moved to {} outside its period {}, period kept",
                    reference, date, existing.period_label
                );
            }
        }

        let id = existing.id;
        let mut active: payment::ActiveModel = existing.into();
        if let Some(amount) = changes.amount {
            active.amount = Set(amount);
        }
        if let Some(date) = changes.payment_date {
            active.payment_date = Set(date);
        }
        if let Some(method) = changes.payment_method {
            active.payment_method = Set(method);
        }
        active.update(&txn).await?;

        recompute_key(&txn, key).await?;

        let stored = payment::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ComputeError::not_found(format!("Payment {}", reference)))?;

        txn.commit().await?;
        Ok(stored)
    }

    /// Removes a payment and recomputes the survivors of its key.
    /// Returns the key the payment belonged to.
    #[instrument(skip(self))]
    pub async fn delete_payment(&self, reference: &str) -> Result<PeriodKey> {
        let existing = find_by_reference(&self.db, reference).await?;
        let key = PeriodKey::of(&existing);

        let _guard = self.locks.acquire(&key).await;
        let result = self.delete_locked(&key, reference).await;

        match &result {
            Ok(survivors) => info!("Deleted payment {}, {} payments left for {}", reference, survivors, key),
            Err(e) => log_failure("Delete", &key, e),
        }
        result.map(|_| key)
    }

    async fn delete_locked(&self, key: &PeriodKey, reference: &str) -> Result<usize> {
        let txn = self.db.begin().await?;

        let existing = find_by_reference(&txn, reference).await?;
        payment::Entity::delete_by_id(existing.id).exec(&txn).await?;

        let survivors = recompute_key(&txn, key).await?;

        txn.commit().await?;
        Ok(survivors)
    }

    /// Recomputes one key under its lock.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn recompute(&self, key: &PeriodKey) -> Result<usize> {
        let _guard = self.locks.acquire(key).await;

        let txn = self.db.begin().await?;
        let result = recompute_key(&txn, key).await;
        match result {
            Ok(count) => {
                txn.commit().await?;
                Ok(count)
            }
            Err(e) => {
                log_failure("Recompute", key, &e);
                Err(e)
            }
        }
    }

    /// Recomputes every period key that has payments. Returns the number of keys.
    #[instrument(skip(self))]
    pub async fn recompute_all(&self) -> Result<usize> {
        let keys: BTreeSet<PeriodKey> = payment::Entity::find()
            .order_by_asc(payment::Column::Id)
            .all(&self.db)
            .await?
            .iter()
            .map(PeriodKey::of)
            .collect();

        debug!("Recomputing {} period keys", keys.len());
        for key in &keys {
            self.recompute(key).await?;
        }

        info!("Recomputed {} period keys", keys.len());
        Ok(keys.len())
    }
}
