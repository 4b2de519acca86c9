use async_trait::async_trait;
use common::{PaymentStatus, PeriodSummary};
use rust_decimal::Decimal;

use super::helpers::{date, money, new_household, new_payment};
use super::{setup_db, run_and_assert_scenario, ExpectedPeriod, TestScenario, TestScenarioBuilder};
use crate::error::Result;
use crate::payment::ledger::PaymentLedger;
use crate::payment::period::PeriodKey;

/// 800,000 due, paid 200,000 then 200,000 and 400,000 on the same later day.
pub struct ScenarioExactPayoff {}

impl ScenarioExactPayoff {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl TestScenarioBuilder for ScenarioExactPayoff {
    async fn get_scenario(&self) -> Result<TestScenario> {
        let db = setup_db().await?;
        let (rental, tenant) = new_household(&db, 800_000).await?;
        let ledger = PaymentLedger::new(db);

        ledger.create_payment(new_payment(&tenant, &rental, 200_000, date(2025, 10, 1))).await?;
        ledger.create_payment(new_payment(&tenant, &rental, 200_000, date(2025, 10, 2))).await?;
        // Same day as the previous one, the higher id applies last
        ledger.create_payment(new_payment(&tenant, &rental, 400_000, date(2025, 10, 2))).await?;

        let expected = vec![ExpectedPeriod {
            key: PeriodKey::new(tenant.id, rental.id, "2025-10"),
            summary: PeriodSummary {
                total_paid: money(800_000),
                total_due: money(800_000),
                remaining_balance: Decimal::ZERO,
                payment_count: 3,
                status: PaymentStatus::Paid,
            },
            snapshots: vec![money(600_000), money(400_000), Decimal::ZERO],
        }];

        Ok((ledger, expected))
    }
}

#[tokio::test]
async fn test_scenario_exact_payoff() {
    let scenario = ScenarioExactPayoff::new();
    run_and_assert_scenario(&scenario).await.expect("Exact payoff scenario failed");
}
