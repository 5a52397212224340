//! Database entities module

pub mod admin_user;
pub mod charger;
pub mod partner;

pub use admin_user::Entity as AdminUser;
pub use charger::Entity as Charger;
pub use partner::Entity as Partner;
