//! Domain layer
//!
//! Entities, the charger control state machine and repository contracts.
//! Nothing in here touches HTTP or the database directly.

pub mod admin;
pub mod charger;
pub mod partner;
pub mod principal;
pub mod repositories;

pub use admin::{AdminUser, AdminUserRepository, NewAdminUser};
pub use charger::{
    Charger, ChargerAction, ChargerConfiguration, ChargerRepository, ChargerStatus, Location,
    NewCharger, TransitionDecision,
};
pub use partner::{
    NewPartner, Partner, PartnerFilter, PartnerRepository, PartnerSettings, PartnerStatistics,
    PartnerStatus, PartnerUpdate,
};
pub use principal::Principal;
pub use repositories::RepositoryProvider;

pub use crate::shared::DomainError;

pub type DomainResult<T> = Result<T, DomainError>;
