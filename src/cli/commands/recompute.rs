use anyhow::{Context, Result};
use compute::PaymentLedger;
use sea_orm::Database;
use tracing::{debug, error, info, trace};

/// Rewrites the snapshots of every period key from its payments.
pub async fn recompute(database_url: &str) -> Result<()> {
    trace!("Entering recompute function");
    debug!("Database URL: {}", database_url);

    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;
    let ledger = PaymentLedger::new(db);

    match ledger.recompute_all().await {
        Ok(keys) => {
            info!("Recomputed snapshots for {} periods", keys);
            Ok(())
        }
        Err(e) => {
            error!("Recompute failed: {}", e);
            Err(e).context("Failed to recompute payment snapshots")
        }
    }
}
