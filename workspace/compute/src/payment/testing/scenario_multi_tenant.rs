use async_trait::async_trait;
use common::{PaymentStatus, PeriodSummary};
use model::entities::payment;
use sea_orm::EntityTrait;

use super::helpers::{date, money, new_payment, new_property, new_rental, new_tenant};
use super::{setup_db, run_and_assert_scenario, ExpectedPeriod, TestScenario, TestScenarioBuilder};
use crate::error::Result;
use crate::payment::ledger::PaymentLedger;
use crate::payment::outstanding::aggregate_outstanding;
use crate::payment::period::PeriodKey;

/// Two tenants sharing a rental, each owing for October.
///
/// Tenant X pays twice and ends at 400,000 owed, tenant Y pays once and
/// ends at 200,000 owed.
pub struct ScenarioMultiTenant {}

impl ScenarioMultiTenant {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl TestScenarioBuilder for ScenarioMultiTenant {
    async fn get_scenario(&self) -> Result<TestScenario> {
        let db = setup_db().await?;
        let property = new_property(&db).await?;
        let rental = new_rental(&db, &property, 800_000).await?;
        let x = new_tenant(&db, &rental, "X").await?;
        let y = new_tenant(&db, &rental, "Y").await?;
        let ledger = PaymentLedger::new(db);

        ledger.create_payment(new_payment(&x, &rental, 200_000, date(2025, 10, 1))).await?;
        ledger.create_payment(new_payment(&y, &rental, 600_000, date(2025, 10, 3))).await?;
        ledger.create_payment(new_payment(&x, &rental, 200_000, date(2025, 10, 5))).await?;

        let expected = vec![
            ExpectedPeriod {
                key: PeriodKey::new(x.id, rental.id, "2025-10"),
                summary: PeriodSummary {
                    total_paid: money(400_000),
                    total_due: money(800_000),
                    remaining_balance: money(400_000),
                    payment_count: 2,
                    status: PaymentStatus::Partial,
                },
                snapshots: vec![money(600_000), money(400_000)],
            },
            ExpectedPeriod {
                key: PeriodKey::new(y.id, rental.id, "2025-10"),
                summary: PeriodSummary {
                    total_paid: money(600_000),
                    total_due: money(800_000),
                    remaining_balance: money(200_000),
                    payment_count: 1,
                    status: PaymentStatus::Partial,
                },
                snapshots: vec![money(200_000)],
            },
        ];

        Ok((ledger, expected))
    }
}

#[tokio::test]
async fn test_scenario_multi_tenant_outstanding() {
    let scenario = ScenarioMultiTenant::new();
    let ledger = run_and_assert_scenario(&scenario).await.expect("Multi tenant scenario failed");

    let records = payment::Entity::find().all(ledger.db()).await.unwrap();
    let totals = aggregate_outstanding(&records);

    // 400,000 from X's latest payment plus 200,000 from Y; X's older 600,000 snapshot is ignored
    assert_eq!(totals.total_outstanding, money(600_000));
    assert_eq!(totals.partial_count, 2);
    assert_eq!(totals.paid_count, 0);
}
