//! # Charger Gateway
//!
//! Partner-facing API for remotely controlling EV chargers and reading
//! their status.
//!
//! ## Architecture
//!
//! - **domain**: entities, the charger state machine and repository traits
//! - **application**: status cache, authorization resolver and services
//! - **infrastructure**: SeaORM and in-memory storage, cache store, crypto,
//!   simulated device link
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: process lifecycle

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
pub use interfaces::http::{create_api_router, ApiServices};
