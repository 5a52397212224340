//! Shared fixtures for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::application::chargers::dto::ControlRequest;
use crate::application::ports::DeviceControlPort;
use crate::domain::{
    AdminUser, Charger, ChargerStatus, NewAdminUser, NewCharger, NewPartner, Partner,
    PartnerSettings, PartnerStatus, RepositoryProvider,
};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::crypto::password::hash_password_with_cost;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret".into(),
        access_token_minutes: 5,
        refresh_token_minutes: 60,
        issuer: "charger-gateway-test".into(),
    }
}

pub async fn seed_partner(
    repos: &dyn RepositoryProvider,
    name: &str,
    api_key: &str,
    max_chargers: i32,
) -> Partner {
    repos
        .partners()
        .insert(NewPartner {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            description: String::new(),
            api_key: api_key.into(),
            status: PartnerStatus::Active,
            max_chargers,
            settings: PartnerSettings::default(),
        })
        .await
        .unwrap()
}

pub async fn seed_charger(
    repos: &dyn RepositoryProvider,
    partner_id: i32,
    charger_id: &str,
    status: ChargerStatus,
) -> Charger {
    repos
        .chargers()
        .insert(NewCharger::new(partner_id, charger_id, status))
        .await
        .unwrap()
}

pub async fn seed_admin(
    repos: &dyn RepositoryProvider,
    username: &str,
    password: &str,
    role: &str,
) -> AdminUser {
    repos
        .admins()
        .insert(NewAdminUser {
            username: username.into(),
            password_hash: hash_password_with_cost(password, 4).unwrap(),
            role: role.into(),
        })
        .await
        .unwrap()
}

/// Device double with a fixed answer that counts calls.
pub struct ScriptedDevice {
    answer: bool,
    calls: AtomicUsize,
}

impl ScriptedDevice {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceControlPort for ScriptedDevice {
    async fn send(&self, _request: &ControlRequest) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}
