//! Partner domain entity

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_MAX_CHARGERS: i32 = 100_000;
pub const MAX_CHARGERS_LIMIT: i32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnerStatus {
    Active,
    Inactive,
    Suspended,
}

impl PartnerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Suspended => "SUSPENDED",
        }
    }
}

impl Default for PartnerStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl fmt::Display for PartnerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartnerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "SUSPENDED" => Ok(Self::Suspended),
            _ => Err(format!("Invalid partner status: {}", s)),
        }
    }
}

/// Free-form partner preferences. Unknown keys are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PartnerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// An external organization owning chargers.
#[derive(Debug, Clone, PartialEq)]
pub struct Partner {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub description: String,
    /// Credential presented in `X-API-Key`
    pub api_key: String,
    pub status: PartnerStatus,
    /// Charger quota
    pub max_chargers: i32,
    pub settings: PartnerSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Partner {
    pub fn is_active(&self) -> bool {
        self.status == PartnerStatus::Active
    }

    /// A partner may act only while ACTIVE and within its quota.
    pub fn may_act(&self, charger_count: u64) -> bool {
        self.is_active() && charger_count <= self.max_chargers.max(0) as u64
    }
}

#[derive(Debug, Clone)]
pub struct NewPartner {
    pub name: String,
    pub email: String,
    pub description: String,
    pub api_key: String,
    pub status: PartnerStatus,
    pub max_chargers: i32,
    pub settings: PartnerSettings,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct PartnerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub max_chargers: Option<i32>,
    pub settings: Option<PartnerSettings>,
    pub status: Option<PartnerStatus>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PartnerFilter {
    pub status: Option<PartnerStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PartnerStatistics {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub suspended: u64,
    pub total_chargers: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partner(status: PartnerStatus, max_chargers: i32) -> Partner {
        Partner {
            id: 1,
            name: "Partner".into(),
            email: "p@example.com".into(),
            description: String::new(),
            api_key: "key".into(),
            status,
            max_chargers,
            settings: PartnerSettings::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn quota_boundary_is_inclusive() {
        let p = partner(PartnerStatus::Active, 2);
        assert!(p.may_act(0));
        assert!(p.may_act(2));
        assert!(!p.may_act(3));
    }

    #[test]
    fn non_active_partner_may_not_act() {
        assert!(!partner(PartnerStatus::Inactive, 10).may_act(0));
        assert!(!partner(PartnerStatus::Suspended, 10).may_act(0));
    }

    #[test]
    fn settings_keep_unknown_keys() {
        let raw = r#"{"timezone":"UTC","theme":"dark"}"#;
        let settings: PartnerSettings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.timezone.as_deref(), Some("UTC"));
        assert_eq!(settings.extra.get("theme"), Some(&serde_json::json!("dark")));

        let back = serde_json::to_value(&settings).unwrap();
        assert_eq!(back["theme"], "dark");
    }
}
