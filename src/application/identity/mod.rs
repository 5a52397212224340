//! Administrator identity: login, token refresh and the bootstrap account.

pub mod service;

pub use service::{AdminAuthService, AuthTokens};
