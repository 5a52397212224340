//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_partners;
mod m20250101_000002_create_chargers;
mod m20250101_000003_create_admin_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_partners::Migration),
            Box::new(m20250101_000002_create_chargers::Migration),
            Box::new(m20250101_000003_create_admin_users::Migration),
        ]
    }
}
