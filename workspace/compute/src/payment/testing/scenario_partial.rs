use async_trait::async_trait;
use common::{PaymentStatus, PeriodSummary};

use super::helpers::{date, money, new_household, new_payment};
use super::{setup_db, run_and_assert_scenario, ExpectedPeriod, TestScenario, TestScenarioBuilder};
use crate::error::Result;
use crate::payment::ledger::PaymentLedger;
use crate::payment::period::PeriodKey;

/// A single 200,000 payment against 800,000 due.
pub struct ScenarioPartial {}

impl ScenarioPartial {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl TestScenarioBuilder for ScenarioPartial {
    async fn get_scenario(&self) -> Result<TestScenario> {
        let db = setup_db().await?;
        let (rental, tenant) = new_household(&db, 800_000).await?;
        let ledger = PaymentLedger::new(db);

        ledger.create_payment(new_payment(&tenant, &rental, 200_000, date(2025, 10, 18))).await?;

        let expected = vec![ExpectedPeriod {
            key: PeriodKey::new(tenant.id, rental.id, "2025-10"),
            summary: PeriodSummary {
                total_paid: money(200_000),
                total_due: money(800_000),
                remaining_balance: money(600_000),
                payment_count: 1,
                status: PaymentStatus::Partial,
            },
            snapshots: vec![money(600_000)],
        }];

        Ok((ledger, expected))
    }
}

#[tokio::test]
async fn test_scenario_partial() {
    let scenario = ScenarioPartial::new();
    run_and_assert_scenario(&scenario).await.expect("Partial scenario failed");
}
