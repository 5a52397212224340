//! Administrator accounts

pub mod model;
pub mod repository;

pub use model::{AdminUser, NewAdminUser};
pub use repository::AdminUserRepository;
