//! SeaORM implementation of ChargerRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::{db_err, insert_err};
use crate::domain::{
    Charger, ChargerRepository, ChargerStatus, DomainError, DomainResult, NewCharger,
};
use crate::infrastructure::database::entities::charger;

pub struct SeaOrmChargerRepository {
    db: DatabaseConnection,
}

impl SeaOrmChargerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_to_entity(status: ChargerStatus) -> charger::ChargerStatus {
    match status {
        ChargerStatus::Available => charger::ChargerStatus::Available,
        ChargerStatus::Charging => charger::ChargerStatus::Charging,
        ChargerStatus::Blocked => charger::ChargerStatus::Blocked,
        ChargerStatus::Reserved => charger::ChargerStatus::Reserved,
        ChargerStatus::Inoperative => charger::ChargerStatus::Inoperative,
        ChargerStatus::Removed => charger::ChargerStatus::Removed,
        ChargerStatus::Unknown => charger::ChargerStatus::Unknown,
    }
}

fn status_to_domain(status: charger::ChargerStatus) -> ChargerStatus {
    match status {
        charger::ChargerStatus::Available => ChargerStatus::Available,
        charger::ChargerStatus::Charging => ChargerStatus::Charging,
        charger::ChargerStatus::Blocked => ChargerStatus::Blocked,
        charger::ChargerStatus::Reserved => ChargerStatus::Reserved,
        charger::ChargerStatus::Inoperative => ChargerStatus::Inoperative,
        charger::ChargerStatus::Removed => ChargerStatus::Removed,
        charger::ChargerStatus::Unknown => ChargerStatus::Unknown,
    }
}

fn to_json<T: Serialize>(value: &Option<T>) -> DomainResult<Option<String>> {
    value
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| DomainError::Validation(format!("Invalid charger data: {}", e)))
}

fn from_json<T: DeserializeOwned>(raw: Option<&str>, charger_id: &str) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(charger_id, error = %e, "Ignoring unreadable charger JSON column");
            None
        }
    }
}

fn model_to_domain(model: charger::Model) -> Charger {
    let location = from_json(model.location.as_deref(), &model.charger_id);
    let configuration = from_json(model.configuration.as_deref(), &model.charger_id);

    Charger {
        id: model.id,
        charger_id: model.charger_id,
        partner_id: model.partner_id,
        name: model.name,
        status: status_to_domain(model.status),
        location,
        configuration,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl ChargerRepository for SeaOrmChargerRepository {
    async fn insert(&self, charger: NewCharger) -> DomainResult<Charger> {
        let now = Utc::now();
        let conflict = format!("Charger {} already exists", charger.charger_id);
        let active = charger::ActiveModel {
            id: NotSet,
            charger_id: Set(charger.charger_id),
            partner_id: Set(charger.partner_id),
            name: Set(charger.name),
            status: Set(status_to_entity(charger.status)),
            location: Set(to_json(&charger.location)?),
            configuration: Set(to_json(&charger.configuration)?),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| insert_err(e, &conflict))?;
        Ok(model_to_domain(model))
    }

    async fn find_for_partner(
        &self,
        partner_id: i32,
        charger_id: &str,
    ) -> DomainResult<Option<Charger>> {
        let model = charger::Entity::find()
            .filter(charger::Column::PartnerId.eq(partner_id))
            .filter(charger::Column::ChargerId.eq(charger_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_charger_id(&self, charger_id: &str) -> DomainResult<Option<Charger>> {
        let model = charger::Entity::find()
            .filter(charger::Column::ChargerId.eq(charger_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list_for_partner(&self, partner_id: i32) -> DomainResult<Vec<Charger>> {
        let models = charger::Entity::find()
            .filter(charger::Column::PartnerId.eq(partner_id))
            .order_by_asc(charger::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn list_all(&self) -> DomainResult<Vec<Charger>> {
        let models = charger::Entity::find()
            .order_by_asc(charger::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update_status(&self, id: i32, status: ChargerStatus) -> DomainResult<Charger> {
        let active = charger::ActiveModel {
            id: Set(id),
            status: Set(status_to_entity(status)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => {
                DomainError::not_found("Charger", "id", id.to_string())
            }
            other => db_err(other),
        })?;
        Ok(model_to_domain(model))
    }

    async fn count_for_partner(&self, partner_id: i32) -> DomainResult<u64> {
        charger::Entity::find()
            .filter(charger::Column::PartnerId.eq(partner_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }

    async fn count_all(&self) -> DomainResult<u64> {
        charger::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
