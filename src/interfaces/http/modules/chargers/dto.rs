//! Charger DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::ChargerStatusSnapshot;
use crate::domain::{ChargerAction, ChargerStatus};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: ChargerStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ControlChargerRequest {
    /// Ignored when present; the path id wins
    #[serde(default)]
    pub charger_id: Option<String>,
    pub action: ChargerAction,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub force: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchStatusResponse {
    pub chargers: Vec<ChargerStatusSnapshot>,
    pub total: usize,
}
