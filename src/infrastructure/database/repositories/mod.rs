//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod admin_user_repository;
pub mod charger_repository;
pub mod partner_repository;
pub mod repository_provider;

pub use repository_provider::SeaOrmRepositoryProvider;

use crate::domain::DomainError;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

/// Maps unique-constraint violations to Conflict, anything else to Storage.
fn insert_err(e: sea_orm::DbErr, conflict: &str) -> DomainError {
    let text = e.to_string();
    if text.contains("UNIQUE") || text.contains("duplicate") {
        DomainError::Conflict(conflict.to_string())
    } else {
        db_err(e)
    }
}
