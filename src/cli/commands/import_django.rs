use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use compute::payment::period::{period_label_for, PeriodKey};
use compute::payment::reference::{advance_counter_past, format_reference, reference_number};
use compute::payment::validation::validate_amount;
use compute::PaymentLedger;
use rust_decimal::Decimal;
use sea_orm::{ActiveEnum, ActiveModelTrait, Database, DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, trace, warn};

use model::entities::payment::PaymentMethod;
use model::entities::{payment, property, rental, tenant};

/// One object of a `dumpdata` JSON array
#[derive(Debug, Deserialize)]
struct DjangoRecord {
    model: String,
    #[serde(deserialize_with = "deserialize_pk")]
    pk: i32,
    fields: serde_json::Value,
}

/// Accepts integer primary keys. String keys (sessions and the like) map to
/// their integer value when they hold one and to 0 otherwise; those models
/// are never imported.
fn deserialize_pk<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let value: serde_json::Value = serde::Deserialize::deserialize(deserializer)?;

    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| D::Error::custom("pk number out of i32 range")),
        serde_json::Value::String(s) => Ok(s.parse().unwrap_or(0)),
        _ => Err(D::Error::custom("pk must be a number or string")),
    }
}

/// properties.property
#[derive(Debug, Deserialize)]
struct DjangoProperty {
    #[serde(default)]
    property_id: String,
    property_name: String,
    address: String,
}

/// rentals.rental
#[derive(Debug, Deserialize)]
struct DjangoRental {
    #[serde(default)]
    rental_number: String,
    rental_type: String,
    property: i32,
    monthly_rent_amount: String,
}

/// tenants.tenant
#[derive(Debug, Deserialize)]
struct DjangoTenant {
    name: String,
    email: String,
    phone_number: String,
    rental: i32,
    move_in_date: String,
}

/// payments.payment
#[derive(Debug, Deserialize)]
struct DjangoPayment {
    #[serde(default)]
    payment_id: String,
    rental: i32,
    tenant: i32,
    amount: String,
    payment_date: String,
    payment_method: String,
}

/// Counts of imported rows
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub properties: usize,
    pub rentals: usize,
    pub tenants: usize,
    pub payments: usize,
    /// Period keys whose snapshots were recomputed
    pub periods: usize,
}

fn parse_decimal(value: &str, what: &str) -> Result<Decimal> {
    Decimal::from_str(value.trim()).with_context(|| format!("Invalid {} '{}'", what, value))
}

fn parse_date(value: &str, what: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").with_context(|| format!("Invalid {} '{}'", what, value))
}

fn records_of<'a>(records: &'a [DjangoRecord], model: &'a str) -> impl Iterator<Item = &'a DjangoRecord> + 'a {
    records.iter().filter(move |r| r.model == model)
}

pub async fn import_django(json_path: &str, database_url: &str) -> Result<()> {
    trace!("Entering import_django function");
    info!("Starting Django data import");
    debug!("JSON path: {}", json_path);
    debug!("Database URL: {}", database_url);

    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let path = Path::new(json_path);
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", json_path))?;

    info!("Parsing JSON data...");
    let records: Vec<DjangoRecord> = serde_json::from_reader(file).context("Failed to parse JSON")?;
    info!("Loaded {} records from Django dump", records.len());

    let summary = import_records(&db, &records).await?;

    info!("Django data import completed successfully!");
    info!("Summary:");
    info!("  - Properties: {}", summary.properties);
    info!("  - Rentals: {}", summary.rentals);
    info!("  - Tenants: {}", summary.tenants);
    info!("  - Payments: {}", summary.payments);
    info!("  - Periods recomputed: {}", summary.periods);

    Ok(())
}

/// Inserts all rows in one transaction, then recomputes every touched period.
async fn import_records(db: &DatabaseConnection, records: &[DjangoRecord]) -> Result<ImportSummary> {
    let txn = db.begin().await?;

    let mut property_map = HashMap::new();
    let mut rental_map = HashMap::new();
    let mut tenant_map = HashMap::new();
    let mut keys = BTreeSet::new();
    let mut highest_reference = 0i64;
    let mut payments = 0;

    info!("Importing properties...");
    for record in records_of(records, "properties.property") {
        let django: DjangoProperty = serde_json::from_value(record.fields.clone())?;
        let code = if django.property_id.trim().is_empty() {
            format!("PROP{:03}", record.pk)
        } else {
            django.property_id
        };

        let inserted = property::ActiveModel {
            property_code: Set(code),
            name: Set(django.property_name),
            address: Set(django.address),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        property_map.insert(record.pk, inserted.id);
        debug!("Imported property {} -> ID {}", inserted.property_code, inserted.id);
    }

    info!("Importing rentals...");
    for record in records_of(records, "rentals.rental") {
        let django: DjangoRental = serde_json::from_value(record.fields.clone())?;
        let property_id = *property_map
            .get(&django.property)
            .ok_or_else(|| anyhow!("Rental {} references unknown property {}", record.pk, django.property))?;
        let rental_type = rental::RentalType::try_from_value(&django.rental_type.trim().to_ascii_uppercase())
            .map_err(|_| anyhow!("Rental {} has unknown type '{}'", record.pk, django.rental_type))?;
        let rental_number = if django.rental_number.trim().is_empty() {
            format!("UNIT{:03}", record.pk)
        } else {
            django.rental_number
        };

        let inserted = rental::ActiveModel {
            rental_number: Set(rental_number),
            rental_type: Set(rental_type),
            property_id: Set(property_id),
            monthly_rent_amount: Set(parse_decimal(&django.monthly_rent_amount, "monthly rent")?),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        rental_map.insert(record.pk, inserted.id);
        debug!("Imported rental {} -> ID {}", inserted.rental_number, inserted.id);
    }

    info!("Importing tenants...");
    for record in records_of(records, "tenants.tenant") {
        let django: DjangoTenant = serde_json::from_value(record.fields.clone())?;
        let rental_id = *rental_map
            .get(&django.rental)
            .ok_or_else(|| anyhow!("Tenant {} references unknown rental {}", record.pk, django.rental))?;

        let inserted = tenant::ActiveModel {
            name: Set(django.name),
            email: Set(django.email),
            phone_number: Set(django.phone_number),
            rental_id: Set(rental_id),
            move_in_date: Set(parse_date(&django.move_in_date, "move-in date")?),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        tenant_map.insert(record.pk, inserted.id);
        debug!("Imported tenant {} -> ID {}", inserted.name, inserted.id);
    }

    info!("Importing payments...");
    let mut django_payments = Vec::new();
    for record in records_of(records, "payments.payment") {
        let django: DjangoPayment = serde_json::from_value(record.fields.clone())?;
        let payment_reference = if django.payment_id.trim().is_empty() {
            format_reference(record.pk as i64)
        } else {
            django.payment_id.clone()
        };
        django_payments.push((reference_number(&payment_reference), record.pk, payment_reference, django));
    }
    // Ids must follow reference order so same-day ties agree with reporting
    django_payments.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    for (number, pk, payment_reference, django) in django_payments {
        let (Some(&tenant_id), Some(&rental_id)) = (tenant_map.get(&django.tenant), rental_map.get(&django.rental))
        else {
            warn!(
                "Skipping payment {}: unknown tenant {} or rental {}",
                pk, django.tenant, django.rental
            );
            continue;
        };

        let amount = parse_decimal(&django.amount, "amount")?;
        if let Err(e) = validate_amount(amount) {
            warn!("Skipping payment {}: {}", payment_reference, e);
            continue;
        }
        let payment_date = parse_date(&django.payment_date, "payment date")?;
        let payment_method = PaymentMethod::from_str(&django.payment_method).map_err(|e| anyhow!(e))?;
        if let Some(number) = number {
            highest_reference = highest_reference.max(number);
        }

        let key = PeriodKey::new(tenant_id, rental_id, period_label_for(payment_date));
        payment::ActiveModel {
            payment_reference: Set(payment_reference),
            tenant_id: Set(tenant_id),
            rental_id: Set(rental_id),
            amount: Set(amount),
            // Replaced by the recompute below
            amount_due: Set(Decimal::ZERO),
            payment_date: Set(payment_date),
            payment_method: Set(payment_method),
            period_label: Set(key.period_label.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        keys.insert(key);
        payments += 1;
    }

    advance_counter_past(&txn, highest_reference).await?;
    txn.commit().await?;
    info!("Imported {} payments, counter at {}", payments, highest_reference);

    let ledger = PaymentLedger::new(db.clone());
    for key in &keys {
        ledger.recompute(key).await?;
    }

    Ok(ImportSummary {
        properties: property_map.len(),
        rentals: rental_map.len(),
        tenants: tenant_map.len(),
        payments,
        periods: keys.len(),
    })
}
