//! Charger control service
//!
//! Orchestrates the status cache, the state machine, the device link and
//! the charger store. Concurrent control requests on the same charger are
//! not serialized: two callers may pass the legality check against the same
//! status and both reach the device.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::dto::{ChargerStatusSnapshot, ControlOutcome, ControlRequest};
use crate::application::cache::StatusCache;
use crate::application::ports::DeviceControlPort;
use crate::domain::{
    Charger, ChargerAction, ChargerStatus, DomainError, DomainResult, RepositoryProvider,
    TransitionDecision,
};

#[derive(Debug, Error)]
enum ControlFailure {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Device did not accept {action} for charger {charger_id}")]
    DeviceRejected {
        charger_id: String,
        action: ChargerAction,
    },
}

impl ControlFailure {
    fn label(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::NotFound { .. }) => "not_found",
            Self::Domain(DomainError::InvalidTransition { .. }) => "rejected",
            Self::Domain(_) => "error",
            Self::DeviceRejected { .. } => "device_failure",
        }
    }
}

pub struct ChargerControlService {
    repos: Arc<dyn RepositoryProvider>,
    cache: StatusCache,
    device: Arc<dyn DeviceControlPort>,
}

impl ChargerControlService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        cache: StatusCache,
        device: Arc<dyn DeviceControlPort>,
    ) -> Self {
        Self {
            repos,
            cache,
            device,
        }
    }

    async fn find_for_partner(&self, partner_id: i32, charger_id: &str) -> DomainResult<Charger> {
        self.repos
            .chargers()
            .find_for_partner(partner_id, charger_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Charger", "charger_id", charger_id))
    }

    /// Partner-scoped status read, served from the cache when possible.
    pub async fn get_status(
        &self,
        partner_id: i32,
        charger_id: &str,
    ) -> DomainResult<ChargerStatusSnapshot> {
        if let Some(cached) = self.cache.get(partner_id, charger_id).await {
            return Ok(cached);
        }

        let snapshot = ChargerStatusSnapshot::from(self.find_for_partner(partner_id, charger_id).await?);
        self.cache.put(partner_id, &snapshot).await;
        Ok(snapshot)
    }

    /// Unscoped, uncached lookup for administrators.
    pub async fn get_status_by_charger_id(
        &self,
        charger_id: &str,
    ) -> DomainResult<ChargerStatusSnapshot> {
        self.repos
            .chargers()
            .find_by_charger_id(charger_id)
            .await?
            .map(ChargerStatusSnapshot::from)
            .ok_or_else(|| DomainError::not_found("Charger", "charger_id", charger_id))
    }

    /// Partner owning `charger_id`.
    pub async fn owner_of(&self, charger_id: &str) -> DomainResult<i32> {
        self.repos
            .chargers()
            .find_by_charger_id(charger_id)
            .await?
            .map(|c| c.partner_id)
            .ok_or_else(|| DomainError::not_found("Charger", "charger_id", charger_id))
    }

    /// Overwrites the status without consulting the state machine.
    pub async fn set_status(
        &self,
        partner_id: i32,
        charger_id: &str,
        status: ChargerStatus,
    ) -> DomainResult<ChargerStatusSnapshot> {
        let charger = self.find_for_partner(partner_id, charger_id).await?;
        let updated = self.repos.chargers().update_status(charger.id, status).await?;
        self.cache.invalidate(partner_id, charger_id).await;

        info!(
            partner_id,
            charger_id,
            from = %charger.status,
            to = %status,
            "Charger status overwritten"
        );
        Ok(updated.into())
    }

    pub async fn control_charger(&self, partner_id: i32, request: ControlRequest) -> ControlOutcome {
        let action = request.action.as_str();
        match self.try_control(partner_id, &request).await {
            Ok(next) => {
                info!(
                    partner_id,
                    charger_id = %request.charger_id,
                    action,
                    status = %next,
                    "Charger control succeeded"
                );
                metrics::counter!("charger_control_total", "action" => action, "outcome" => "success")
                    .increment(1);
                ControlOutcome::succeeded(&request)
            }
            Err(failure) => {
                warn!(
                    partner_id,
                    charger_id = %request.charger_id,
                    action,
                    error = %failure,
                    "Charger control failed"
                );
                metrics::counter!("charger_control_total", "action" => action, "outcome" => failure.label())
                    .increment(1);
                ControlOutcome::failed(&request, failure.to_string())
            }
        }
    }

    async fn try_control(
        &self,
        partner_id: i32,
        request: &ControlRequest,
    ) -> Result<ChargerStatus, ControlFailure> {
        let charger = self.find_for_partner(partner_id, &request.charger_id).await?;

        let decision = TransitionDecision::decide(charger.status, request.action);
        let next = match decision.next_status {
            Some(next) if decision.allowed => next,
            _ => {
                return Err(DomainError::InvalidTransition {
                    status: charger.status.to_string(),
                    action: request.action.to_string(),
                }
                .into())
            }
        };

        debug!(charger_id = %request.charger_id, action = %request.action, "Sending control request to device");
        if !self.device.send(request).await {
            return Err(ControlFailure::DeviceRejected {
                charger_id: request.charger_id.clone(),
                action: request.action,
            });
        }

        self.repos.chargers().update_status(charger.id, next).await?;
        self.cache.invalidate(partner_id, &request.charger_id).await;
        Ok(next)
    }

    /// Bulk read straight from the store. `None` means every partner.
    pub async fn get_batch_status(
        &self,
        partner_id: Option<i32>,
    ) -> DomainResult<Vec<ChargerStatusSnapshot>> {
        let chargers = match partner_id {
            Some(id) => self.repos.chargers().list_for_partner(id).await?,
            None => self.repos.chargers().list_all().await?,
        };
        Ok(chargers.into_iter().map(ChargerStatusSnapshot::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache::status_cache::DEFAULT_STATUS_TTL;
    use crate::application::ports::CacheStore;
    use crate::infrastructure::cache::InMemoryCacheStore;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use crate::test_support::{seed_charger, seed_partner, ScriptedDevice};
    use ChargerAction::*;
    use ChargerStatus::*;

    struct Fixture {
        repos: Arc<InMemoryRepositoryProvider>,
        store: Arc<InMemoryCacheStore>,
        device: Arc<ScriptedDevice>,
        service: ChargerControlService,
    }

    fn fixture(device_answer: bool) -> Fixture {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let store = Arc::new(InMemoryCacheStore::new());
        let device = Arc::new(ScriptedDevice::new(device_answer));
        let service = ChargerControlService::new(
            repos.clone(),
            StatusCache::new(store.clone(), DEFAULT_STATUS_TTL),
            device.clone(),
        );
        Fixture {
            repos,
            store,
            device,
            service,
        }
    }

    async fn cached(store: &InMemoryCacheStore, partner_id: i32, charger_id: &str) -> bool {
        store
            .get(&StatusCache::key(partner_id, charger_id))
            .await
            .unwrap()
            .is_some()
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let f = fixture(true);
        let partner = seed_partner(f.repos.as_ref(), "A", "key-a", 10).await;
        let charger = seed_charger(f.repos.as_ref(), partner.id, "C1", Available).await;

        let first = f.service.get_status(partner.id, "C1").await.unwrap();
        // Change the record behind the service's back; a cache hit must not see it.
        f.repos.chargers().update_status(charger.id, Blocked).await.unwrap();
        let second = f.service.get_status(partner.id, "C1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.status, Available);
    }

    #[tokio::test]
    async fn read_of_foreign_charger_is_not_found() {
        let f = fixture(true);
        let a = seed_partner(f.repos.as_ref(), "A", "key-a", 10).await;
        let b = seed_partner(f.repos.as_ref(), "B", "key-b", 10).await;
        seed_charger(f.repos.as_ref(), a.id, "C1", Available).await;

        let err = f.service.get_status(b.id, "C1").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(!cached(&f.store, b.id, "C1").await);
    }

    #[tokio::test]
    async fn turn_on_from_available_charges_and_invalidates() {
        let f = fixture(true);
        let partner = seed_partner(f.repos.as_ref(), "A", "key-a", 10).await;
        seed_charger(f.repos.as_ref(), partner.id, "C1", Available).await;
        f.service.get_status(partner.id, "C1").await.unwrap();
        assert!(cached(&f.store, partner.id, "C1").await);

        let outcome = f
            .service
            .control_charger(partner.id, ControlRequest::new("C1", TurnOn))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.error, None);
        assert_eq!(f.device.calls(), 1);
        assert!(!cached(&f.store, partner.id, "C1").await);
        let stored = f.service.get_status_by_charger_id("C1").await.unwrap();
        assert_eq!(stored.status, Charging);
    }

    #[tokio::test]
    async fn disallowed_actions_never_reach_the_device() {
        for status in ChargerStatus::ALL {
            for action in ChargerAction::ALL {
                if TransitionDecision::decide(status, action).allowed {
                    continue;
                }
                let f = fixture(true);
                let partner = seed_partner(f.repos.as_ref(), "A", "key-a", 10).await;
                seed_charger(f.repos.as_ref(), partner.id, "C1", status).await;

                let outcome = f
                    .service
                    .control_charger(partner.id, ControlRequest::new("C1", action))
                    .await;

                assert!(!outcome.success);
                let error = outcome.error.unwrap();
                assert!(error.contains(status.as_str()), "{}", error);
                assert!(error.contains(action.as_str()), "{}", error);
                assert_eq!(f.device.calls(), 0);
                let stored = f.service.get_status_by_charger_id("C1").await.unwrap();
                assert_eq!(stored.status, status);
            }
        }
    }

    #[tokio::test]
    async fn unknown_charger_is_a_soft_failure() {
        let f = fixture(true);
        let partner = seed_partner(f.repos.as_ref(), "A", "key-a", 10).await;

        let outcome = f
            .service
            .control_charger(partner.id, ControlRequest::new("NOPE", TurnOff))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Charger NOPE not found"));
        assert_eq!(outcome.charger_id, "NOPE");
        assert_eq!(f.device.calls(), 0);
    }

    #[tokio::test]
    async fn device_failure_leaves_status_and_cache_alone() {
        let f = fixture(false);
        let partner = seed_partner(f.repos.as_ref(), "A", "key-a", 10).await;
        seed_charger(f.repos.as_ref(), partner.id, "C1", Charging).await;
        f.service.get_status(partner.id, "C1").await.unwrap();

        let outcome = f
            .service
            .control_charger(partner.id, ControlRequest::new("C1", TurnOff))
            .await;

        assert!(!outcome.success);
        assert!(outcome.error.is_some());
        assert_eq!(f.device.calls(), 1);
        assert!(cached(&f.store, partner.id, "C1").await);
        let stored = f.service.get_status_by_charger_id("C1").await.unwrap();
        assert_eq!(stored.status, Charging);
    }

    #[tokio::test]
    async fn set_status_invalidates_only_its_own_key() {
        let f = fixture(true);
        let a = seed_partner(f.repos.as_ref(), "A", "key-a", 10).await;
        let b = seed_partner(f.repos.as_ref(), "B", "key-b", 10).await;
        seed_charger(f.repos.as_ref(), a.id, "A1", Available).await;
        seed_charger(f.repos.as_ref(), b.id, "B1", Available).await;
        f.service.get_status(a.id, "A1").await.unwrap();
        f.service.get_status(b.id, "B1").await.unwrap();

        let snapshot = f.service.set_status(a.id, "A1", Inoperative).await.unwrap();

        assert_eq!(snapshot.status, Inoperative);
        assert!(!cached(&f.store, a.id, "A1").await);
        assert!(cached(&f.store, b.id, "B1").await);
        assert_eq!(f.service.get_status(a.id, "A1").await.unwrap().status, Inoperative);
    }

    #[tokio::test]
    async fn set_status_on_missing_charger_is_not_found() {
        let f = fixture(true);
        let partner = seed_partner(f.repos.as_ref(), "A", "key-a", 10).await;
        let err = f.service.set_status(partner.id, "X", Available).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn batch_status_is_scoped_by_partner() {
        let f = fixture(true);
        let a = seed_partner(f.repos.as_ref(), "A", "key-a", 10).await;
        let b = seed_partner(f.repos.as_ref(), "B", "key-b", 10).await;
        seed_charger(f.repos.as_ref(), a.id, "A1", Available).await;
        seed_charger(f.repos.as_ref(), a.id, "A2", Charging).await;
        seed_charger(f.repos.as_ref(), b.id, "B1", Blocked).await;

        assert_eq!(f.service.get_batch_status(Some(a.id)).await.unwrap().len(), 2);
        assert_eq!(f.service.get_batch_status(Some(b.id)).await.unwrap().len(), 1);
        assert_eq!(f.service.get_batch_status(None).await.unwrap().len(), 3);
        assert!(!cached(&f.store, a.id, "A1").await);
    }

    #[tokio::test]
    async fn owner_lookup() {
        let f = fixture(true);
        let b = seed_partner(f.repos.as_ref(), "B", "key-b", 10).await;
        seed_charger(f.repos.as_ref(), b.id, "B1", Blocked).await;
        assert_eq!(f.service.owner_of("B1").await.unwrap(), b.id);
        assert!(f.service.owner_of("B9").await.is_err());
    }
}
