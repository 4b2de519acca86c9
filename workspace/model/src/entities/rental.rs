use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{payment, property, tenant};

/// The kind of unit being rented out
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RentalType {
    #[sea_orm(string_value = "SINGLE_ROOM")]
    SingleRoom,
    #[sea_orm(string_value = "DOUBLE_ROOM")]
    DoubleRoom,
    #[sea_orm(string_value = "SHOP")]
    Shop,
    #[sea_orm(string_value = "APARTMENT")]
    Apartment,
    #[sea_orm(string_value = "HOUSE")]
    House,
    #[sea_orm(string_value = "STUDIO")]
    Studio,
}

/// A single rentable unit inside a property.
/// Corresponds to Django's `rentals.Rental`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rentals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display number, e.g. `SUNRIS001`.
    #[sea_orm(unique)]
    pub rental_number: String,
    pub rental_type: RentalType,
    pub property_id: i32,
    /// The rent charged for every billing period of this rental.
    /// This is the single source of truth for what a tenant owes per period.
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub monthly_rent_amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "property::Entity",
        from = "Column::PropertyId",
        to = "property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,
    #[sea_orm(has_many = "tenant::Entity")]
    Tenant,
    #[sea_orm(has_many = "payment::Entity")]
    Payment,
}

impl Related<property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
