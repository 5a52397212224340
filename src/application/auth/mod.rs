//! Request authorization
//!
//! An ordered list of strategies tried in sequence; the first that yields a
//! principal wins.

pub mod resolver;
pub mod strategies;

pub use resolver::{AuthStrategy, AuthorizationResolver, Credentials};
pub use strategies::{ApiKeyStrategy, TokenStrategy};
