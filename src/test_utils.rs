#[cfg(test)]
pub mod test_utils {
    use crate::config::AppConfig;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use chrono::NaiveDate;
    use compute::PaymentLedger;
    use migration::{Migrator, MigratorTrait};
    use model::entities::{property, rental, tenant};
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Ids of the seeded rental and its tenants
    #[derive(Debug, Clone, Copy)]
    pub struct Seed {
        /// Rent 800,000
        pub rental_id: i32,
        pub bob_id: i32,
        pub alice_id: i32,
    }

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// One property with one 800,000 rental shared by Bob and Alice
    pub async fn seed_rental(db: &DatabaseConnection) -> Seed {
        let sunrise = property::ActiveModel {
            property_code: Set("PROP001".to_string()),
            name: Set("Sunrise Estates".to_string()),
            address: Set("Plot 12, Ntinda Road, Kampala".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test property");

        let unit = rental::ActiveModel {
            rental_number: Set("SUNRIS001".to_string()),
            rental_type: Set(rental::RentalType::DoubleRoom),
            property_id: Set(sunrise.id),
            monthly_rent_amount: Set(Decimal::new(800_000, 0)),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test rental");

        let mut ids = Vec::new();
        for (name, email) in [("Bob", "bob@example.com"), ("Alice", "alice@example.com")] {
            let tenant = tenant::ActiveModel {
                name: Set(name.to_string()),
                email: Set(email.to_string()),
                phone_number: Set("0700000000".to_string()),
                rental_id: Set(unit.id),
                move_in_date: Set(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()),
                ..Default::default()
            }
            .insert(db)
            .await
            .expect("Failed to create test tenant");
            ids.push(tenant.id);
        }

        Seed {
            rental_id: unit.id,
            bob_id: ids[0],
            alice_id: ids[1],
        }
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> (AppState, Seed) {
        let db = setup_test_db().await;
        let seed = seed_rental(&db).await;

        let cache = AppConfig::default().build_cache();
        let state = AppState {
            ledger: PaymentLedger::new(db.clone()),
            db,
            cache,
        };
        (state, seed)
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is taken from RUST_LOG and defaults to WARN.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| level.parse::<Level>().ok())
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> (Router, Seed) {
        let _guard = init_test_tracing();

        let (state, seed) = setup_test_app_state().await;
        (create_router(state), seed)
    }
}
