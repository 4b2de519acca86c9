use chrono::{Datelike, NaiveDate};
use model::entities::payment;
use std::fmt;

use crate::error::{ComputeError, Result};

/// Groups payments that settle the same month of rent for one tenant in one rental.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodKey {
    pub tenant_id: i32,
    pub rental_id: i32,
    pub period_label: String,
}

impl PeriodKey {
    pub fn new(tenant_id: i32, rental_id: i32, period_label: impl Into<String>) -> Self {
        Self {
            tenant_id,
            rental_id,
            period_label: period_label.into(),
        }
    }

    /// Key of an already stored payment.
    pub fn of(payment: &payment::Model) -> Self {
        Self::new(payment.tenant_id, payment.rental_id, payment.period_label.clone())
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tenant={} rental={} period={}",
            self.tenant_id, self.rental_id, self.period_label
        )
    }
}

/// `YYYY-MM` label of the month a date falls into.
pub fn period_label_for(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Checks that a label is exactly `YYYY-MM` with a real month and returns
/// the first day of that month.
pub fn parse_period_label(label: &str) -> Result<NaiveDate> {
    let malformed = || ComputeError::validation(format!("Malformed period label '{}', expected YYYY-MM", label));

    let bytes = label.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return Err(malformed());
    }
    if !bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit) {
        return Err(malformed());
    }

    let year: i32 = label[..4].parse().map_err(|_| malformed())?;
    let month: u32 = label[5..].parse().map_err(|_| malformed())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(malformed)
}

/// Returns true when `date` lies in the month named by `label`.
pub fn date_in_period(date: NaiveDate, label: &str) -> bool {
    period_label_for(date) == label
}
