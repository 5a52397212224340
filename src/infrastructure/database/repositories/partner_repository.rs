//! SeaORM implementation of PartnerRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::warn;

use super::{db_err, insert_err};
use crate::domain::{
    DomainError, DomainResult, NewPartner, Partner, PartnerFilter, PartnerRepository,
    PartnerSettings, PartnerStatus, PartnerUpdate,
};
use crate::infrastructure::database::entities::partner;
use crate::shared::{PageRequest, PaginatedResult};

pub struct SeaOrmPartnerRepository {
    db: DatabaseConnection,
}

impl SeaOrmPartnerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_to_entity(status: PartnerStatus) -> partner::PartnerStatus {
    match status {
        PartnerStatus::Active => partner::PartnerStatus::Active,
        PartnerStatus::Inactive => partner::PartnerStatus::Inactive,
        PartnerStatus::Suspended => partner::PartnerStatus::Suspended,
    }
}

fn status_to_domain(status: partner::PartnerStatus) -> PartnerStatus {
    match status {
        partner::PartnerStatus::Active => PartnerStatus::Active,
        partner::PartnerStatus::Inactive => PartnerStatus::Inactive,
        partner::PartnerStatus::Suspended => PartnerStatus::Suspended,
    }
}

fn settings_to_json(settings: &PartnerSettings) -> DomainResult<String> {
    serde_json::to_string(settings)
        .map_err(|e| DomainError::Validation(format!("Invalid partner settings: {}", e)))
}

fn model_to_domain(model: partner::Model) -> Partner {
    let settings = serde_json::from_str(&model.settings).unwrap_or_else(|e| {
        warn!(partner_id = model.id, error = %e, "Unreadable partner settings, using defaults");
        PartnerSettings::default()
    });

    Partner {
        id: model.id,
        name: model.name,
        email: model.email,
        description: model.description,
        api_key: model.api_key,
        status: status_to_domain(model.status),
        max_chargers: model.max_chargers,
        settings,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl PartnerRepository for SeaOrmPartnerRepository {
    async fn insert(&self, partner: NewPartner) -> DomainResult<Partner> {
        let now = Utc::now();
        let active = partner::ActiveModel {
            id: NotSet,
            name: Set(partner.name),
            email: Set(partner.email),
            description: Set(partner.description),
            api_key: Set(partner.api_key),
            status: Set(status_to_entity(partner.status)),
            max_chargers: Set(partner.max_chargers),
            settings: Set(settings_to_json(&partner.settings)?),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| insert_err(e, "Partner email or API key already exists"))?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Partner>> {
        let model = partner::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Partner>> {
        let model = partner::Entity::find()
            .filter(partner::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_api_key(&self, api_key: &str) -> DomainResult<Option<Partner>> {
        let model = partner::Entity::find()
            .filter(partner::Column::ApiKey.eq(api_key))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list(
        &self,
        filter: PartnerFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<Partner>> {
        let mut query = partner::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(partner::Column::Status.eq(status_to_entity(status)));
        }
        query = query
            .order_by_desc(partner::Column::CreatedAt)
            .order_by_desc(partner::Column::Id);

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let models = query
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models.into_iter().map(model_to_domain).collect();
        Ok(PaginatedResult::new(items, total, page.page, page.limit))
    }

    async fn update(&self, id: i32, update: PartnerUpdate) -> DomainResult<Partner> {
        let existing = partner::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Partner", "id", id.to_string()))?;

        let mut active: partner::ActiveModel = existing.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(email) = update.email {
            active.email = Set(email);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(max_chargers) = update.max_chargers {
            active.max_chargers = Set(max_chargers);
        }
        if let Some(settings) = update.settings {
            active.settings = Set(settings_to_json(&settings)?);
        }
        if let Some(status) = update.status {
            active.status = Set(status_to_entity(status));
        }
        if let Some(api_key) = update.api_key {
            active.api_key = Set(api_key);
        }
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| insert_err(e, "Partner email or API key already exists"))?;
        Ok(model_to_domain(model))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = partner::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Partner", "id", id.to_string()));
        }
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        partner::Entity::find().count(&self.db).await.map_err(db_err)
    }

    async fn count_by_status(&self, status: PartnerStatus) -> DomainResult<u64> {
        partner::Entity::find()
            .filter(partner::Column::Status.eq(status_to_entity(status)))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
