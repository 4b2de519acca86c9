pub use sea_orm_migration::prelude::*;

mod m20251001_000001_create_rental_tables;
mod m20251020_000001_add_payment_period_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_rental_tables::Migration),
            Box::new(m20251020_000001_add_payment_period_index::Migration),
        ]
    }
}
