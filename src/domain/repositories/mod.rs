//! Aggregated repository access

use async_trait::async_trait;

use super::admin::AdminUserRepository;
use super::charger::ChargerRepository;
use super::partner::PartnerRepository;
use super::DomainResult;

/// Single handle on every repository, backed either by the database or
/// by in-memory maps.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn partners(&self) -> &dyn PartnerRepository;
    fn chargers(&self) -> &dyn ChargerRepository;
    fn admins(&self) -> &dyn AdminUserRepository;

    /// Cheap liveness probe of the backing store.
    async fn ping(&self) -> DomainResult<()>;
}
