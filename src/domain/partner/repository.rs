//! Partner repository interface

use async_trait::async_trait;

use super::model::{NewPartner, Partner, PartnerFilter, PartnerStatus, PartnerUpdate};
use crate::domain::DomainResult;
use crate::shared::{PageRequest, PaginatedResult};

#[async_trait]
pub trait PartnerRepository: Send + Sync {
    async fn insert(&self, partner: NewPartner) -> DomainResult<Partner>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Partner>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Partner>>;
    async fn find_by_api_key(&self, api_key: &str) -> DomainResult<Option<Partner>>;
    /// Newest first.
    async fn list(
        &self,
        filter: PartnerFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Partner>>;
    async fn update(&self, id: i32, update: PartnerUpdate) -> DomainResult<Partner>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
    async fn count(&self) -> DomainResult<u64>;
    async fn count_by_status(&self, status: PartnerStatus) -> DomainResult<u64>;
}
