//! Non-persistent repository backend

pub mod memory;

pub use memory::InMemoryRepositoryProvider;
