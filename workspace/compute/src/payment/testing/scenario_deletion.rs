use async_trait::async_trait;
use common::{PaymentStatus, PeriodSummary};

use super::helpers::{date, money, new_household, new_payment};
use super::{setup_db, run_and_assert_scenario, ExpectedPeriod, TestScenario, TestScenarioBuilder};
use crate::error::Result;
use crate::payment::ledger::PaymentLedger;
use crate::payment::period::PeriodKey;

/// 100,000, 200,000 and 300,000 against 800,000, then the middle payment is
/// deleted. The last one is recomputed from the first and itself.
pub struct ScenarioDeletion {}

impl ScenarioDeletion {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl TestScenarioBuilder for ScenarioDeletion {
    async fn get_scenario(&self) -> Result<TestScenario> {
        let db = setup_db().await?;
        let (rental, tenant) = new_household(&db, 800_000).await?;
        let ledger = PaymentLedger::new(db);

        ledger.create_payment(new_payment(&tenant, &rental, 100_000, date(2025, 10, 1))).await?;
        let second = ledger.create_payment(new_payment(&tenant, &rental, 200_000, date(2025, 10, 8))).await?;
        let third = ledger.create_payment(new_payment(&tenant, &rental, 300_000, date(2025, 10, 15))).await?;
        assert_eq!(second.amount_due, money(500_000));
        assert_eq!(third.amount_due, money(200_000));

        ledger.delete_payment(&second.payment_reference).await?;

        let expected = vec![ExpectedPeriod {
            key: PeriodKey::new(tenant.id, rental.id, "2025-10"),
            summary: PeriodSummary {
                total_paid: money(400_000),
                total_due: money(800_000),
                remaining_balance: money(400_000),
                payment_count: 2,
                status: PaymentStatus::Partial,
            },
            snapshots: vec![money(700_000), money(400_000)],
        }];

        Ok((ledger, expected))
    }
}

#[tokio::test]
async fn test_scenario_deletion_reshuffles_snapshots() {
    let scenario = ScenarioDeletion::new();
    run_and_assert_scenario(&scenario).await.expect("Deletion scenario failed");
}
