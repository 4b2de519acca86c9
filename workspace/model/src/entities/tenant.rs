use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::{payment, rental};

/// A person occupying a rental.
/// Corresponds to Django's `tenants.Tenant`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: String,
    /// The rental this tenant currently occupies.
    pub rental_id: i32,
    pub move_in_date: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "rental::Entity",
        from = "Column::RentalId",
        to = "rental::Column::Id",
        on_delete = "Cascade"
    )]
    Rental,
    #[sea_orm(has_many = "payment::Entity")]
    Payment,
}

impl Related<rental::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rental.def()
    }
}

impl Related<payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
