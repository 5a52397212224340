//! Partner management endpoints (administrator token only)

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
