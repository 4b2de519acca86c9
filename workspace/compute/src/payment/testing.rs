pub mod helpers;
pub mod scenario_deletion;
pub mod scenario_exact_payoff;
pub mod scenario_multi_tenant;
pub mod scenario_no_payments;
pub mod scenario_partial;

pub use scenario_deletion::ScenarioDeletion;
pub use scenario_exact_payoff::ScenarioExactPayoff;
pub use scenario_multi_tenant::ScenarioMultiTenant;
pub use scenario_no_payments::ScenarioNoPayments;
pub use scenario_partial::ScenarioPartial;

use async_trait::async_trait;
use common::PeriodSummary;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};

use crate::error::Result as ComputeResult;
use crate::payment::balance::{find_period_payments, summarize, verify_running_balance};
use crate::payment::ledger::PaymentLedger;
use crate::payment::period::PeriodKey;
use migration::{Migrator, MigratorTrait};

pub async fn setup_db() -> Result<DatabaseConnection, DbErr> {
    // Connect to the SQLite database
    let db = Database::connect("sqlite::memory:").await?;

    // Enable foreign keys
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

    Migrator::up(&db, None).await.expect("Migrations failed.");
    Ok(db)
}

/// Expected state of one period key once a scenario has been played.
#[derive(Debug, Clone)]
pub struct ExpectedPeriod {
    pub key: PeriodKey,
    pub summary: PeriodSummary,
    /// `amount_due` of each payment in running order
    pub snapshots: Vec<Decimal>,
}

/// Type representing the expected result of a test scenario.
pub type AssertResult = Vec<ExpectedPeriod>;

/// Prepared test scenario.
pub type TestScenario = (PaymentLedger, AssertResult);

/// Trait for building test scenarios.
#[async_trait]
pub trait TestScenarioBuilder {
    async fn get_scenario(&self) -> ComputeResult<TestScenario>;
}

/// Plays a scenario and checks every expected period against the database.
/// Returns the ledger so callers can keep going.
pub async fn run_and_assert_scenario(builder: &dyn TestScenarioBuilder) -> ComputeResult<PaymentLedger> {
    let (ledger, expected) = builder.get_scenario().await?;

    for period in &expected {
        let summary = summarize(ledger.db(), &period.key, period.summary.total_due).await?;
        assert_eq!(summary, period.summary, "summary of {}", period.key);

        let payments = find_period_payments(ledger.db(), &period.key).await?;
        let snapshots: Vec<Decimal> = payments.iter().map(|p| p.amount_due).collect();
        assert_eq!(snapshots, period.snapshots, "snapshots of {}", period.key);

        verify_running_balance(&payments, period.summary.total_due)?;
    }

    Ok(ledger)
}
