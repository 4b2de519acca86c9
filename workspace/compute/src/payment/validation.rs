use chrono::NaiveDate;
use model::entities::payment::PaymentMethod;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{ComputeError, Result};

/// Maximum number of fractional digits a payment amount may carry.
pub const AMOUNT_SCALE: u32 = 2;

/// Payment amounts must be positive with at most two fractional digits.
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(ComputeError::validation(format!(
            "Payment amount must be greater than zero, got {}",
            amount
        )));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(ComputeError::validation(format!(
            "Payment amount {} has more than {} fractional digits",
            amount, AMOUNT_SCALE
        )));
    }
    Ok(())
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_payment_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ComputeError::validation(format!("Invalid date format '{}', expected YYYY-MM-DD", value)))
}

pub fn parse_payment_method(value: &str) -> Result<PaymentMethod> {
    PaymentMethod::from_str(value).map_err(ComputeError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(Decimal::new(200_000, 0)).is_ok());
        assert!(validate_amount(Decimal::new(20_000_050, 2)).is_ok());
        // Trailing zeros do not count as precision
        assert!(validate_amount(Decimal::new(1_000, 3)).is_ok());

        assert!(matches!(validate_amount(Decimal::ZERO), Err(ComputeError::Validation(_))));
        assert!(matches!(validate_amount(Decimal::new(-5, 0)), Err(ComputeError::Validation(_))));
        assert!(matches!(validate_amount(Decimal::new(1_005, 3)), Err(ComputeError::Validation(_))));
    }

    #[test]
    fn test_parse_payment_date() {
        assert_eq!(
            parse_payment_date("2025-10-18").unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 18).unwrap()
        );
        assert!(matches!(parse_payment_date("18/10/2025"), Err(ComputeError::Validation(_))));
        assert!(matches!(parse_payment_date("2025-02-30"), Err(ComputeError::Validation(_))));
    }

    #[test]
    fn test_parse_payment_method() {
        assert_eq!(parse_payment_method("mobile").unwrap(), PaymentMethod::Mobile);
        assert!(matches!(parse_payment_method("CHEQUE"), Err(ComputeError::Validation(_))));
    }
}
