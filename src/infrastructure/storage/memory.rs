//! In-memory repositories for development and testing

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::domain::{
    AdminUser, AdminUserRepository, Charger, ChargerRepository, ChargerStatus, DomainError,
    DomainResult, NewAdminUser, NewCharger, NewPartner, Partner, PartnerFilter, PartnerRepository,
    PartnerStatus, PartnerUpdate, RepositoryProvider,
};
use crate::shared::{PageRequest, PaginatedResult};

#[derive(Default)]
pub struct InMemoryPartnerRepository {
    partners: DashMap<i32, Partner>,
    counter: AtomicI32,
}

#[async_trait]
impl PartnerRepository for InMemoryPartnerRepository {
    async fn insert(&self, partner: NewPartner) -> DomainResult<Partner> {
        if self
            .partners
            .iter()
            .any(|p| p.email == partner.email || p.api_key == partner.api_key)
        {
            return Err(DomainError::Conflict(
                "Partner email or API key already exists".into(),
            ));
        }

        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let partner = Partner {
            id,
            name: partner.name,
            email: partner.email,
            description: partner.description,
            api_key: partner.api_key,
            status: partner.status,
            max_chargers: partner.max_chargers,
            settings: partner.settings,
            created_at: now,
            updated_at: now,
        };
        self.partners.insert(id, partner.clone());
        Ok(partner)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Partner>> {
        Ok(self.partners.get(&id).map(|p| p.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Partner>> {
        Ok(self
            .partners
            .iter()
            .find(|p| p.email == email)
            .map(|p| p.value().clone()))
    }

    async fn find_by_api_key(&self, api_key: &str) -> DomainResult<Option<Partner>> {
        Ok(self
            .partners
            .iter()
            .find(|p| p.api_key == api_key)
            .map(|p| p.value().clone()))
    }

    async fn list(
        &self,
        filter: PartnerFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Partner>> {
        let mut partners: Vec<Partner> = self
            .partners
            .iter()
            .filter(|p| filter.status.map_or(true, |s| p.status == s))
            .map(|p| p.value().clone())
            .collect();
        partners.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = partners.len() as u64;
        let items = partners
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok(PaginatedResult::new(items, total, page.page, page.limit))
    }

    async fn update(&self, id: i32, update: PartnerUpdate) -> DomainResult<Partner> {
        let mut partner = self
            .partners
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Partner", "id", id.to_string()))?;

        if let Some(name) = update.name {
            partner.name = name;
        }
        if let Some(email) = update.email {
            partner.email = email;
        }
        if let Some(description) = update.description {
            partner.description = description;
        }
        if let Some(max_chargers) = update.max_chargers {
            partner.max_chargers = max_chargers;
        }
        if let Some(settings) = update.settings {
            partner.settings = settings;
        }
        if let Some(status) = update.status {
            partner.status = status;
        }
        if let Some(api_key) = update.api_key {
            partner.api_key = api_key;
        }
        partner.updated_at = Utc::now();

        Ok(partner.clone())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.partners
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Partner", "id", id.to_string()))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.partners.len() as u64)
    }

    async fn count_by_status(&self, status: PartnerStatus) -> DomainResult<u64> {
        Ok(self.partners.iter().filter(|p| p.status == status).count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryChargerRepository {
    chargers: DashMap<i32, Charger>,
    counter: AtomicI32,
}

impl InMemoryChargerRepository {
    fn sorted(&self, keep: impl Fn(&Charger) -> bool) -> Vec<Charger> {
        let mut chargers: Vec<Charger> = self
            .chargers
            .iter()
            .filter(|c| keep(c.value()))
            .map(|c| c.value().clone())
            .collect();
        chargers.sort_by_key(|c| c.id);
        chargers
    }
}

#[async_trait]
impl ChargerRepository for InMemoryChargerRepository {
    async fn insert(&self, charger: NewCharger) -> DomainResult<Charger> {
        if self
            .chargers
            .iter()
            .any(|c| c.charger_id == charger.charger_id)
        {
            return Err(DomainError::Conflict(format!(
                "Charger {} already exists",
                charger.charger_id
            )));
        }

        let id = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let charger = Charger {
            id,
            charger_id: charger.charger_id,
            partner_id: charger.partner_id,
            name: charger.name,
            status: charger.status,
            location: charger.location,
            configuration: charger.configuration,
            created_at: now,
            updated_at: now,
        };
        self.chargers.insert(id, charger.clone());
        Ok(charger)
    }

    async fn find_for_partner(
        &self,
        partner_id: i32,
        charger_id: &str,
    ) -> DomainResult<Option<Charger>> {
        Ok(self
            .chargers
            .iter()
            .find(|c| c.partner_id == partner_id && c.charger_id == charger_id)
            .map(|c| c.value().clone()))
    }

    async fn find_by_charger_id(&self, charger_id: &str) -> DomainResult<Option<Charger>> {
        Ok(self
            .chargers
            .iter()
            .find(|c| c.charger_id == charger_id)
            .map(|c| c.value().clone()))
    }

    async fn list_for_partner(&self, partner_id: i32) -> DomainResult<Vec<Charger>> {
        Ok(self.sorted(|c| c.partner_id == partner_id))
    }

    async fn list_all(&self) -> DomainResult<Vec<Charger>> {
        Ok(self.sorted(|_| true))
    }

    async fn update_status(&self, id: i32, status: ChargerStatus) -> DomainResult<Charger> {
        let mut charger = self
            .chargers
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Charger", "id", id.to_string()))?;
        charger.status = status;
        charger.updated_at = Utc::now();
        Ok(charger.clone())
    }

    async fn count_for_partner(&self, partner_id: i32) -> DomainResult<u64> {
        Ok(self
            .chargers
            .iter()
            .filter(|c| c.partner_id == partner_id)
            .count() as u64)
    }

    async fn count_all(&self) -> DomainResult<u64> {
        Ok(self.chargers.len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryAdminUserRepository {
    admins: DashMap<String, AdminUser>,
}

#[async_trait]
impl AdminUserRepository for InMemoryAdminUserRepository {
    async fn insert(&self, admin: NewAdminUser) -> DomainResult<AdminUser> {
        if self.admins.iter().any(|a| a.username == admin.username) {
            return Err(DomainError::Conflict("Username already exists".into()));
        }

        let admin = AdminUser {
            id: uuid::Uuid::new_v4().to_string(),
            username: admin.username,
            password_hash: admin.password_hash,
            role: admin.role,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        };
        self.admins.insert(admin.id.clone(), admin.clone());
        Ok(admin)
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<AdminUser>> {
        Ok(self.admins.get(id).map(|a| a.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<AdminUser>> {
        Ok(self
            .admins
            .iter()
            .find(|a| a.username == username)
            .map(|a| a.value().clone()))
    }

    async fn touch_last_login(&self, id: &str) -> DomainResult<()> {
        if let Some(mut admin) = self.admins.get_mut(id) {
            admin.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.admins.len() as u64)
    }
}

/// Repository provider holding everything in `DashMap`s.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    partners: InMemoryPartnerRepository,
    chargers: InMemoryChargerRepository,
    admins: InMemoryAdminUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
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
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PartnerSettings;

    fn new_partner(email: &str, key: &str) -> NewPartner {
        NewPartner {
            name: "P".into(),
            email: email.into(),
            description: String::new(),
            api_key: key.into(),
            status: PartnerStatus::Active,
            max_chargers: 10,
            settings: PartnerSettings::default(),
        }
    }

    #[tokio::test]
    async fn partner_uniqueness() {
        let repos = InMemoryRepositoryProvider::new();
        repos.partners().insert(new_partner("a@x", "k1")).await.unwrap();
        assert!(repos.partners().insert(new_partner("a@x", "k2")).await.is_err());
        assert!(repos.partners().insert(new_partner("b@x", "k1")).await.is_err());
    }

    #[tokio::test]
    async fn charger_lookup_is_partner_scoped() {
        let repos = InMemoryRepositoryProvider::new();
        repos
            .chargers()
            .insert(NewCharger::new(1, "C1", ChargerStatus::Available))
            .await
            .unwrap();

        assert!(repos.chargers().find_for_partner(1, "C1").await.unwrap().is_some());
        assert!(repos.chargers().find_for_partner(2, "C1").await.unwrap().is_none());
        assert!(repos.chargers().find_by_charger_id("C1").await.unwrap().is_some());
        assert!(repos
            .chargers()
            .insert(NewCharger::new(2, "C1", ChargerStatus::Available))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn update_status_touches_timestamp() {
        let repos = InMemoryRepositoryProvider::new();
        let c = repos
            .chargers()
            .insert(NewCharger::new(1, "C1", ChargerStatus::Available))
            .await
            .unwrap();
        let updated = repos
            .chargers()
            .update_status(c.id, ChargerStatus::Charging)
            .await
            .unwrap();
        assert_eq!(updated.status, ChargerStatus::Charging);
        assert!(updated.updated_at >= c.updated_at);
    }
}
