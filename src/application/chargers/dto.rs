//! Charger read models and control messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Charger, ChargerAction, ChargerConfiguration, ChargerStatus, Location};

/// Last-known status of a charger, as served from the cache or the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChargerStatusSnapshot {
    pub charger_id: String,
    pub status: ChargerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ChargerConfiguration>,
    pub updated_at: DateTime<Utc>,
}

impl From<Charger> for ChargerStatusSnapshot {
    fn from(charger: Charger) -> Self {
        Self {
            charger_id: charger.charger_id,
            status: charger.status,
            name: charger.name,
            location: charger.location,
            configuration: charger.configuration,
            updated_at: charger.updated_at,
        }
    }
}

/// Message handed to the device link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRequest {
    pub charger_id: String,
    pub action: ChargerAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

impl ControlRequest {
    pub fn new(charger_id: impl Into<String>, action: ChargerAction) -> Self {
        Self {
            charger_id: charger_id.into(),
            action,
            reason: None,
            force: None,
        }
    }
}

/// Result of a control attempt. Failures are reported here, never raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ControlOutcome {
    pub charger_id: String,
    pub action: ChargerAction,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ControlOutcome {
    pub fn succeeded(request: &ControlRequest) -> Self {
        Self {
            charger_id: request.charger_id.clone(),
            action: request.action,
            success: true,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(request: &ControlRequest, error: impl Into<String>) -> Self {
        Self {
            charger_id: request.charger_id.clone(),
            action: request.action,
            success: false,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}
