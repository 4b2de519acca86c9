use async_trait::async_trait;
use common::{PaymentStatus, PeriodSummary};
use rust_decimal::Decimal;

use super::helpers::{money, new_household};
use super::{setup_db, run_and_assert_scenario, ExpectedPeriod, TestScenario, TestScenarioBuilder};
use crate::error::Result;
use crate::payment::ledger::PaymentLedger;
use crate::payment::period::PeriodKey;

/// 500,000 due and nothing paid.
pub struct ScenarioNoPayments {}

impl ScenarioNoPayments {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl TestScenarioBuilder for ScenarioNoPayments {
    async fn get_scenario(&self) -> Result<TestScenario> {
        let db = setup_db().await?;
        let (rental, tenant) = new_household(&db, 500_000).await?;
        let ledger = PaymentLedger::new(db);

        let expected = vec![ExpectedPeriod {
            key: PeriodKey::new(tenant.id, rental.id, "2025-10"),
            summary: PeriodSummary {
                total_paid: Decimal::ZERO,
                total_due: money(500_000),
                remaining_balance: money(500_000),
                payment_count: 0,
                status: PaymentStatus::Unpaid,
            },
            snapshots: vec![],
        }];

        Ok((ledger, expected))
    }
}

#[tokio::test]
async fn test_scenario_no_payments() {
    let scenario = ScenarioNoPayments::new();
    run_and_assert_scenario(&scenario).await.expect("No payments scenario failed");
}
