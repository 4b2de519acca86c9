//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the rental management application here.
//! The tables mirror the Django apps read by `import-django` (properties,
//! rentals, tenants, payments) plus a `sequences` counter table.

pub mod payment;
pub mod property;
pub mod rental;
pub mod sequence;
pub mod tenant;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::payment::Entity as Payment;
    pub use super::property::Entity as Property;
    pub use super::rental::Entity as Rental;
    pub use super::sequence::Entity as Sequence;
    pub use super::tenant::Entity as Tenant;
}
