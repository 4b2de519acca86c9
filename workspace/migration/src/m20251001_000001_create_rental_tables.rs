use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create properties table
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(pk_auto(Properties::Id))
                    .col(string(Properties::PropertyCode).unique_key())
                    .col(string(Properties::Name))
                    .col(string(Properties::Address))
                    .to_owned(),
            )
            .await?;

        // Create rentals table
        manager
            .create_table(
                Table::create()
                    .table(Rentals::Table)
                    .if_not_exists()
                    .col(pk_auto(Rentals::Id))
                    .col(string(Rentals::RentalNumber).unique_key())
                    .col(string(Rentals::RentalType).string_len(20))
                    .col(integer(Rentals::PropertyId))
                    .col(decimal(Rentals::MonthlyRentAmount).decimal_len(12, 2))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rental_property")
                            .from(Rentals::Table, Rentals::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create tenants table
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(pk_auto(Tenants::Id))
                    .col(string(Tenants::Name))
                    .col(string(Tenants::Email).unique_key())
                    .col(string(Tenants::PhoneNumber))
                    .col(integer(Tenants::RentalId))
                    .col(date(Tenants::MoveInDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_rental")
                            .from(Tenants::Table, Tenants::RentalId)
                            .to(Rentals::Table, Rentals::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create payments table
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(pk_auto(Payments::Id))
                    .col(string(Payments::PaymentReference).unique_key())
                    .col(integer(Payments::TenantId))
                    .col(integer(Payments::RentalId))
                    .col(decimal(Payments::Amount).decimal_len(12, 2))
                    .col(decimal(Payments::AmountDue).decimal_len(12, 2))
                    .col(date(Payments::PaymentDate))
                    .col(string(Payments::PaymentMethod).string_len(20))
                    .col(string(Payments::PeriodLabel).string_len(7))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_tenant")
                            .from(Payments::Table, Payments::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_rental")
                            .from(Payments::Table, Payments::RentalId)
                            .to(Rentals::Table, Rentals::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create sequences table and seed the payment counter
        manager
            .create_table(
                Table::create()
                    .table(Sequences::Table)
                    .if_not_exists()
                    .col(string(Sequences::Name).primary_key())
                    .col(big_integer(Sequences::Value).default(0))
                    .to_owned(),
            )
            .await?;

        let seed = Query::insert()
            .into_table(Sequences::Table)
            .columns([Sequences::Name, Sequences::Value])
            .values_panic(["payment".into(), 0i64.into()])
            .to_owned();
        manager.exec_stmt(seed).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Sequences::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Rentals::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    PropertyCode,
    Name,
    Address,
}

#[derive(DeriveIden)]
enum Rentals {
    Table,
    Id,
    RentalNumber,
    RentalType,
    PropertyId,
    MonthlyRentAmount,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
    Name,
    Email,
    PhoneNumber,
    RentalId,
    MoveInDate,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    PaymentReference,
    TenantId,
    RentalId,
    Amount,
    AmountDue,
    PaymentDate,
    PaymentMethod,
    PeriodLabel,
}

#[derive(DeriveIden)]
enum Sequences {
    Table,
    Name,
    Value,
}
