//! Charger domain entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Charger status. Drives the control state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargerStatus {
    Available,
    Charging,
    Blocked,
    Reserved,
    Inoperative,
    Removed,
    Unknown,
}

impl ChargerStatus {
    pub const ALL: [ChargerStatus; 7] = [
        Self::Available,
        Self::Charging,
        Self::Blocked,
        Self::Reserved,
        Self::Inoperative,
        Self::Removed,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Charging => "CHARGING",
            Self::Blocked => "BLOCKED",
            Self::Reserved => "RESERVED",
            Self::Inoperative => "INOPERATIVE",
            Self::Removed => "REMOVED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl Default for ChargerStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for ChargerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChargerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid charger status: {}", s))
    }
}

/// Geographic location of a charger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Electrical configuration of a charger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChargerConfiguration {
    /// Power rating (kW)
    pub power_rating: f64,
    pub connector_type: String,
    /// Voltage (V)
    pub voltage: f64,
    /// Current (A)
    pub current: f64,
}

/// Charger entity
#[derive(Debug, Clone, PartialEq)]
pub struct Charger {
    /// Surrogate primary key
    pub id: i32,
    /// Business identifier, globally unique
    pub charger_id: String,
    /// Owning partner
    pub partner_id: i32,
    pub name: Option<String>,
    pub status: ChargerStatus,
    pub location: Option<Location>,
    pub configuration: Option<ChargerConfiguration>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for inserting a new charger record
#[derive(Debug, Clone)]
pub struct NewCharger {
    pub charger_id: String,
    pub partner_id: i32,
    pub name: Option<String>,
    pub status: ChargerStatus,
    pub location: Option<Location>,
    pub configuration: Option<ChargerConfiguration>,
}

impl NewCharger {
    pub fn new(partner_id: i32, charger_id: impl Into<String>, status: ChargerStatus) -> Self {
        Self {
            charger_id: charger_id.into(),
            partner_id,
            name: None,
            status,
            location: None,
            configuration: None,
        }
    }
}
