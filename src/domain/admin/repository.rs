use async_trait::async_trait;

use super::model::{AdminUser, NewAdminUser};
use crate::domain::DomainResult;

#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    async fn insert(&self, admin: NewAdminUser) -> DomainResult<AdminUser>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<AdminUser>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<AdminUser>>;
    async fn touch_last_login(&self, id: &str) -> DomainResult<()>;
    async fn count(&self) -> DomainResult<u64>;
}
