use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Every balance recompute filters on the full period key
        manager
            .create_index(
                Index::create()
                    .name("idx_payments_period_key")
                    .table(Alias::new("payments"))
                    .col(Alias::new("tenant_id"))
                    .col(Alias::new("rental_id"))
                    .col(Alias::new("period_label"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_payments_period_key")
                    .table(Alias::new("payments"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
