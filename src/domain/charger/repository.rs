//! Charger repository interface

use async_trait::async_trait;

use super::model::{Charger, ChargerStatus, NewCharger};
use crate::domain::DomainResult;

#[async_trait]
pub trait ChargerRepository: Send + Sync {
    async fn insert(&self, charger: NewCharger) -> DomainResult<Charger>;
    async fn find_for_partner(&self, partner_id: i32, charger_id: &str)
        -> DomainResult<Option<Charger>>;
    async fn find_by_charger_id(&self, charger_id: &str) -> DomainResult<Option<Charger>>;
    async fn list_for_partner(&self, partner_id: i32) -> DomainResult<Vec<Charger>>;
    async fn list_all(&self) -> DomainResult<Vec<Charger>>;
    /// Persists a new status and refreshes `updated_at`.
    async fn update_status(&self, id: i32, status: ChargerStatus) -> DomainResult<Charger>;
    async fn count_for_partner(&self, partner_id: i32) -> DomainResult<u64>;
    async fn count_all(&self) -> DomainResult<u64>;
}
