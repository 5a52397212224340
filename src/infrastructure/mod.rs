//! Infrastructure layer - external concerns

pub mod cache;
pub mod crypto;
pub mod database;
pub mod device;
pub mod seed;
pub mod storage;

pub use cache::InMemoryCacheStore;
pub use database::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};
pub use device::SimulatedDeviceController;
pub use storage::InMemoryRepositoryProvider;
