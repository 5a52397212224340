//! Partner DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::CreatePartner;
use crate::domain::{Partner, PartnerSettings, PartnerStatus, PartnerUpdate};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartnerDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub description: String,
    pub api_key: String,
    pub status: PartnerStatus,
    pub max_chargers: i32,
    pub settings: PartnerSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Partner> for PartnerDto {
    fn from(p: Partner) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            description: p.description,
            api_key: p.api_key,
            status: p.status,
            max_chargers: p.max_chargers,
            settings: p.settings,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePartnerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 1_000_000))]
    pub max_chargers: Option<i32>,
    pub settings: Option<PartnerSettings>,
}

impl From<CreatePartnerRequest> for CreatePartner {
    fn from(r: CreatePartnerRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            description: r.description,
            max_chargers: r.max_chargers,
            settings: r.settings,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePartnerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 1_000_000))]
    pub max_chargers: Option<i32>,
    pub settings: Option<PartnerSettings>,
    pub status: Option<PartnerStatus>,
}

impl From<UpdatePartnerRequest> for PartnerUpdate {
    fn from(r: UpdatePartnerRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            description: r.description,
            max_chargers: r.max_chargers,
            settings: r.settings,
            status: r.status,
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangeStatusRequest {
    pub status: PartnerStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPartnersParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub status: Option<PartnerStatus>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChargerCountResponse {
    pub partner_id: i32,
    pub charger_count: u64,
}
