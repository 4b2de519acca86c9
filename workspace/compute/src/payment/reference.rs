use model::entities::sequence;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::{debug, instrument, trace};

use crate::error::{ComputeError, Result};

/// Name of the counter row in `sequences` that numbers payments.
pub const PAYMENT_SEQUENCE: &str = "payment";

const REFERENCE_PREFIX: &str = "PAY-";

/// Formats a counter value as a display reference, e.g. `PAY-0007`.
pub fn format_reference(number: i64) -> String {
    format!("{}{:04}", REFERENCE_PREFIX, number)
}

/// Numeric part of a `PAY-NNNN` reference.
pub fn reference_number(reference: &str) -> Option<i64> {
    reference.strip_prefix(REFERENCE_PREFIX)?.parse().ok()
}

/// Increments the payment counter and returns the new reference.
///
/// Must run on the connection of the transaction that inserts the payment so
/// a rolled back insert does not consume a number.
#[instrument(skip(db))]
pub async fn next_reference<C: ConnectionTrait>(db: &C) -> Result<String> {
    let updated = sequence::Entity::update_many()
        .col_expr(sequence::Column::Value, Expr::col(sequence::Column::Value).add(1))
        .filter(sequence::Column::Name.eq(PAYMENT_SEQUENCE))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        debug!("Payment counter row missing, creating it");
        sequence::ActiveModel {
            name: Set(PAYMENT_SEQUENCE.to_string()),
            value: Set(1),
        }
        .insert(db)
        .await?;
    }

    let counter = sequence::Entity::find_by_id(PAYMENT_SEQUENCE.to_string())
        .one(db)
        .await?
        .ok_or_else(|| ComputeError::not_found("payment counter"))?;

    let reference = format_reference(counter.value);
    trace!("Assigned payment reference {}", reference);
    Ok(reference)
}

/// Moves the counter forward so the next reference is above `highest`.
/// Never moves it backwards.
#[instrument(skip(db))]
pub async fn advance_counter_past<C: ConnectionTrait>(db: &C, highest: i64) -> Result<()> {
    let current = sequence::Entity::find_by_id(PAYMENT_SEQUENCE.to_string())
        .one(db)
        .await?;

    match current {
        Some(counter) if counter.value >= highest => {
            trace!("Payment counter already at {}, not advancing", counter.value);
        }
        Some(counter) => {
            let mut active: sequence::ActiveModel = counter.into();
            active.value = Set(highest);
            active.update(db).await?;
            debug!("Advanced payment counter to {}", highest);
        }
        None => {
            sequence::ActiveModel {
                name: Set(PAYMENT_SEQUENCE.to_string()),
                value: Set(highest),
            }
            .insert(db)
            .await?;
            debug!("Created payment counter at {}", highest);
        }
    }

    Ok(())
}
