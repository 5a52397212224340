//! Application layer: use-case orchestration on top of the domain.

pub mod auth;
pub mod cache;
pub mod chargers;
pub mod identity;
pub mod partners;
pub mod ports;

pub use auth::{ApiKeyStrategy, AuthStrategy, AuthorizationResolver, Credentials, TokenStrategy};
pub use cache::StatusCache;
pub use chargers::{ChargerControlService, ChargerStatusSnapshot, ControlOutcome, ControlRequest};
pub use identity::{AdminAuthService, AuthTokens};
pub use partners::{CreatePartner, PartnerService};
pub use ports::{CacheError, CacheStore, DeviceControlPort};
