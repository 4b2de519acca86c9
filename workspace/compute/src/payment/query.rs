use chrono::NaiveDate;
use common::{PaymentDetail, PaymentInfo, PaymentStatistics, PeriodSummary};
use model::entities::{payment, property, rental, tenant};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder};
use tracing::{debug, instrument, trace, warn};

use super::balance::{resolve_total_due, summarize};
use super::outstanding::payment_statistics;
use super::period::{parse_period_label, period_label_for, PeriodKey};
use super::validation::parse_payment_date;
use crate::error::{ComputeError, Result};

/// Optional filters for listing payments and dashboard statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    pub tenant_id: Option<i32>,
    pub rental_id: Option<i32>,
    pub period_label: Option<String>,
}

/// Payments matching `filter`, most recent first.
#[instrument(skip(db))]
pub async fn list_payments<C: ConnectionTrait>(db: &C, filter: &PaymentFilter) -> Result<Vec<payment::Model>> {
    let mut query = payment::Entity::find();

    if let Some(tenant_id) = filter.tenant_id {
        query = query.filter(payment::Column::TenantId.eq(tenant_id));
    }
    if let Some(rental_id) = filter.rental_id {
        query = query.filter(payment::Column::RentalId.eq(rental_id));
    }
    if let Some(label) = &filter.period_label {
        parse_period_label(label)?;
        query = query.filter(payment::Column::PeriodLabel.eq(label.as_str()));
    }

    let payments = query
        .order_by_desc(payment::Column::PaymentDate)
        .order_by_desc(payment::Column::Id)
        .all(db)
        .await?;

    debug!("Listed {} payments", payments.len());
    Ok(payments)
}

#[instrument(skip(db))]
pub async fn find_by_reference<C: ConnectionTrait>(db: &C, reference: &str) -> Result<payment::Model> {
    payment::Entity::find()
        .filter(payment::Column::PaymentReference.eq(reference))
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found(format!("Payment {}", reference)))
}

async fn find_tenant<C: ConnectionTrait>(db: &C, tenant_id: i32) -> Result<tenant::Model> {
    tenant::Entity::find_by_id(tenant_id)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found(format!("Tenant with id {}", tenant_id)))
}

async fn find_rental<C: ConnectionTrait>(db: &C, rental_id: i32) -> Result<rental::Model> {
    rental::Entity::find_by_id(rental_id)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found(format!("Rental with id {}", rental_id)))
}

/// Balance of one period key, validated against existing tenant and rental.
#[instrument(skip(db))]
pub async fn period_summary<C: ConnectionTrait>(
    db: &C,
    tenant_id: i32,
    rental_id: i32,
    period_label: &str,
) -> Result<PeriodSummary> {
    parse_period_label(period_label)?;
    find_tenant(db, tenant_id).await?;
    let total_due = resolve_total_due(db, rental_id).await?;

    summarize(db, &PeriodKey::new(tenant_id, rental_id, period_label), total_due).await
}

/// A payment with the names around it and the balance of its period.
#[instrument(skip(db))]
pub async fn payment_detail<C: ConnectionTrait>(db: &C, reference: &str) -> Result<PaymentDetail> {
    let payment = find_by_reference(db, reference).await?;

    let tenant = payment
        .find_related(tenant::Entity)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found(format!("Tenant with id {}", payment.tenant_id)))?;
    let rental = payment
        .find_related(rental::Entity)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found(format!("Rental with id {}", payment.rental_id)))?;
    let property = rental
        .find_related(property::Entity)
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found(format!("Property with id {}", rental.property_id)))?;

    let summary = summarize(db, &PeriodKey::of(&payment), rental.monthly_rent_amount).await?;
    trace!("Payment {} belongs to {} / {}", payment.payment_reference, tenant.name, property.name);

    Ok(PaymentDetail {
        payment_reference: payment.payment_reference,
        tenant_name: tenant.name,
        property_name: property.name,
        rental_number: rental.rental_number,
        amount: payment.amount,
        amount_due: payment.amount_due,
        remaining_balance: summary.remaining_balance,
        total_paid: summary.total_paid,
        payment_status: summary.status,
        payment_date: payment.payment_date,
        payment_method: payment.payment_method.to_string(),
        period_label: payment.period_label,
    })
}

/// Pre-fill data for a payment a tenant is about to make.
///
/// Tenant and rental are resolved first, then the date is parsed. With no
/// payments yet the remaining balance is the full monthly rent.
#[instrument(skip(db))]
pub async fn payment_info<C: ConnectionTrait>(
    db: &C,
    tenant_id: i32,
    rental_id: i32,
    payment_date: &str,
) -> Result<PaymentInfo> {
    let tenant = find_tenant(db, tenant_id).await?;
    let rental = find_rental(db, rental_id).await?;

    if tenant.rental_id != rental.id {
        warn!("Tenant {} is not assigned to rental {}", tenant.id, rental.id);
    }

    let date = parse_payment_date(payment_date)?;
    let period_label = period_label_for(date);
    let summary = summarize(
        db,
        &PeriodKey::new(tenant.id, rental.id, period_label.clone()),
        rental.monthly_rent_amount,
    )
    .await?;

    Ok(PaymentInfo {
        period_label,
        remaining_balance: summary.remaining_balance,
        total_paid: summary.total_paid,
        payment_count: summary.payment_count,
        status: summary.status,
        monthly_rent: rental.monthly_rent_amount,
    })
}

/// Dashboard statistics over the payments matching `filter`.
#[instrument(skip(db))]
pub async fn statistics<C: ConnectionTrait>(
    db: &C,
    filter: &PaymentFilter,
    today: NaiveDate,
) -> Result<PaymentStatistics> {
    let payments = list_payments(db, filter).await?;
    Ok(payment_statistics(&payments, today))
}
