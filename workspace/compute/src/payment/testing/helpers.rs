use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

use crate::payment::ledger::NewPayment;
use crate::payment::period::period_label_for;
use crate::payment::reference::format_reference;
use model::entities::payment::PaymentMethod;
use model::entities::{payment, property, rental, tenant};

pub type Result<T> = std::result::Result<T, DbErr>;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Whole currency units as a two-place decimal.
pub fn money(amount: i64) -> Decimal {
    Decimal::new(amount * 100, 2)
}

/// Unsaved payment of tenant 1 in rental 1, for pure computations.
pub fn payment_model(id: i32, payment_date: NaiveDate, amount: i64) -> payment::Model {
    payment::Model {
        id,
        payment_reference: format_reference(id as i64),
        tenant_id: 1,
        rental_id: 1,
        amount: money(amount),
        amount_due: Decimal::ZERO,
        payment_date,
        payment_method: PaymentMethod::Cash,
        period_label: period_label_for(payment_date),
    }
}

pub fn new_payment(tenant: &tenant::Model, rental: &rental::Model, amount: i64, payment_date: NaiveDate) -> NewPayment {
    NewPayment {
        tenant_id: tenant.id,
        rental_id: rental.id,
        amount: money(amount),
        payment_date,
        payment_method: PaymentMethod::Cash,
        period_label: None,
    }
}

pub async fn new_property(db: &DatabaseConnection) -> Result<property::Model> {
    static PROPERTY_ID: AtomicU64 = AtomicU64::new(1);

    let current_id = PROPERTY_ID.fetch_add(1, Ordering::SeqCst);
    property::ActiveModel {
        property_code: Set(format!("PROP{:03}", current_id)),
        name: Set(format!("Property {}", current_id)),
        address: Set("Plot 12, Ntinda Road, Kampala".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_rental(db: &DatabaseConnection, property: &property::Model, monthly_rent: i64) -> Result<rental::Model> {
    static RENTAL_ID: AtomicU64 = AtomicU64::new(1);

    let current_id = RENTAL_ID.fetch_add(1, Ordering::SeqCst);
    rental::ActiveModel {
        rental_number: Set(format!("UNIT{:03}", current_id)),
        rental_type: Set(rental::RentalType::Apartment),
        property_id: Set(property.id),
        monthly_rent_amount: Set(money(monthly_rent)),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn new_tenant(db: &DatabaseConnection, rental: &rental::Model, name: &str) -> Result<tenant::Model> {
    static TENANT_ID: AtomicU64 = AtomicU64::new(1);

    let current_id = TENANT_ID.fetch_add(1, Ordering::SeqCst);
    tenant::ActiveModel {
        name: Set(name.to_string()),
        email: Set(format!("tenant{}@example.com", current_id)),
        phone_number: Set(format!("0700{:06}", current_id)),
        rental_id: Set(rental.id),
        move_in_date: Set(date(2025, 1, 1)),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// A property with one rental and one tenant living in it.
pub async fn new_household(
    db: &DatabaseConnection,
    monthly_rent: i64,
) -> Result<(rental::Model, tenant::Model)> {
    let property = new_property(db).await?;
    let rental = new_rental(db, &property, monthly_rent).await?;
    let tenant = new_tenant(db, &rental, "Bob").await?;
    Ok((rental, tenant))
}
