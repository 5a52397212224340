//! Partner management and partner validity checks

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::partner::model::{DEFAULT_MAX_CHARGERS, MAX_CHARGERS_LIMIT};
use crate::domain::{
    DomainError, DomainResult, NewPartner, Partner, PartnerFilter, PartnerSettings,
    PartnerStatistics, PartnerStatus, PartnerUpdate, RepositoryProvider,
};
use crate::infrastructure::crypto::api_key::{fingerprint, generate_api_key};
use crate::shared::{PageRequest, PaginatedResult};

#[derive(Debug, Clone, Default)]
pub struct CreatePartner {
    pub name: String,
    pub email: String,
    pub description: Option<String>,
    pub max_chargers: Option<i32>,
    pub settings: Option<PartnerSettings>,
}

pub struct PartnerService {
    repos: Arc<dyn RepositoryProvider>,
}

impl PartnerService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    fn check_quota(max_chargers: i32) -> DomainResult<()> {
        if !(1..=MAX_CHARGERS_LIMIT).contains(&max_chargers) {
            return Err(DomainError::Validation(format!(
                "max_chargers must be between 1 and {}",
                MAX_CHARGERS_LIMIT
            )));
        }
        Ok(())
    }

    pub async fn create(&self, input: CreatePartner) -> DomainResult<Partner> {
        let max_chargers = input.max_chargers.unwrap_or(DEFAULT_MAX_CHARGERS);
        Self::check_quota(max_chargers)?;

        if self.repos.partners().find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let partner = self
            .repos
            .partners()
            .insert(NewPartner {
                name: input.name,
                email: input.email,
                description: input.description.unwrap_or_default(),
                api_key: generate_api_key(),
                status: PartnerStatus::Active,
                max_chargers,
                settings: input.settings.unwrap_or_default(),
            })
            .await?;

        info!(partner_id = partner.id, email = %partner.email, "Partner created");
        Ok(partner)
    }

    pub async fn list(
        &self,
        status: Option<PartnerStatus>,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Partner>> {
        self.repos
            .partners()
            .list(PartnerFilter { status }, page)
            .await
    }

    pub async fn statistics(&self) -> DomainResult<PartnerStatistics> {
        let partners = self.repos.partners();
        Ok(PartnerStatistics {
            total: partners.count().await?,
            active: partners.count_by_status(PartnerStatus::Active).await?,
            inactive: partners.count_by_status(PartnerStatus::Inactive).await?,
            suspended: partners.count_by_status(PartnerStatus::Suspended).await?,
            total_chargers: self.repos.chargers().count_all().await?,
        })
    }

    pub async fn get(&self, id: i32) -> DomainResult<Partner> {
        self.repos
            .partners()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Partner", "id", id.to_string()))
    }

    pub async fn update(&self, id: i32, update: PartnerUpdate) -> DomainResult<Partner> {
        self.get(id).await?;

        if let Some(max_chargers) = update.max_chargers {
            Self::check_quota(max_chargers)?;
        }
        if let Some(email) = &update.email {
            if let Some(existing) = self.repos.partners().find_by_email(email).await? {
                if existing.id != id {
                    return Err(DomainError::Conflict("Email already exists".into()));
                }
            }
        }

        let partner = self.repos.partners().update(id, update).await?;
        info!(partner_id = id, "Partner updated");
        Ok(partner)
    }

    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        self.get(id).await?;

        let chargers = self.repos.chargers().count_for_partner(id).await?;
        if chargers > 0 {
            return Err(DomainError::Conflict(format!(
                "Cannot delete partner with {} existing chargers",
                chargers
            )));
        }

        self.repos.partners().delete(id).await?;
        info!(partner_id = id, "Partner deleted");
        Ok(())
    }

    pub async fn change_status(&self, id: i32, status: PartnerStatus) -> DomainResult<Partner> {
        let partner = self
            .update(
                id,
                PartnerUpdate {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await?;
        info!(partner_id = id, status = %status, "Partner status changed");
        Ok(partner)
    }

    /// Issues a fresh key. The previous key stops resolving immediately.
    pub async fn rotate_api_key(&self, id: i32) -> DomainResult<Partner> {
        let partner = self
            .update(
                id,
                PartnerUpdate {
                    api_key: Some(generate_api_key()),
                    ..Default::default()
                },
            )
            .await?;
        info!(partner_id = id, key = %fingerprint(&partner.api_key), "Partner API key rotated");
        Ok(partner)
    }

    pub async fn charger_count(&self, id: i32) -> DomainResult<u64> {
        self.get(id).await?;
        self.repos.chargers().count_for_partner(id).await
    }

    /// Exact-match lookup used by the API-key strategy.
    pub async fn find_by_api_key(&self, api_key: &str) -> DomainResult<Option<Partner>> {
        self.repos.partners().find_by_api_key(api_key).await
    }

    /// Fails with Unauthorized unless the partner is ACTIVE and within quota.
    /// Runs on every request that acts as a partner.
    pub async fn ensure_principal_valid(&self, partner_id: i32) -> DomainResult<Partner> {
        let partner = self
            .repos
            .partners()
            .find_by_id(partner_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Invalid API key".into()))?;

        if !partner.is_active() {
            warn!(partner_id, status = %partner.status, "Rejected request from non-active partner");
            return Err(DomainError::Unauthorized(format!(
                "Partner is {}",
                partner.status
            )));
        }

        let count = self.repos.chargers().count_for_partner(partner_id).await?;
        if !partner.may_act(count) {
            warn!(
                partner_id,
                count,
                max_chargers = partner.max_chargers,
                "Rejected request from partner over charger quota"
            );
            return Err(DomainError::Unauthorized(
                "Partner charger quota exceeded".into(),
            ));
        }

        Ok(partner)
    }
}
