//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use crate::domain::{
    AdminUserRepository, ChargerRepository, DomainResult, PartnerRepository, RepositoryProvider,
};

use super::admin_user_repository::SeaOrmAdminUserRepository;
use super::charger_repository::SeaOrmChargerRepository;
use super::db_err;
use super::partner_repository::SeaOrmPartnerRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let partner = repos.partners().find_by_api_key(key).await?;
/// let charger = repos.chargers().find_for_partner(partner.id, "CHARGER_A1").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    partners: SeaOrmPartnerRepository,
    chargers: SeaOrmChargerRepository,
    admins: SeaOrmAdminUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            partners: SeaOrmPartnerRepository::new(db.clone()),
            chargers: SeaOrmChargerRepository::new(db.clone()),
            admins: SeaOrmAdminUserRepository::new(db.clone()),
            db,
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn partners(&self) -> &dyn PartnerRepository {
        &self.partners
    }

    fn chargers(&self) -> &dyn ChargerRepository {
        &self.chargers
    }

    fn admins(&self) -> &dyn AdminUserRepository {
        &self.admins
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1",
            ))
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
