//! Liveness, readiness and dependency health probes

pub mod handlers;

pub use handlers::*;
