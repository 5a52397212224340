//! HTTP REST API
//!
//! - `middleware`: credential resolution into a [`Principal`](crate::domain::Principal)
//! - `modules`: handlers and DTOs per resource
//! - `router`: route table and OpenAPI document

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, ApiServices};
