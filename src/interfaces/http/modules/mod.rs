pub mod admin;
pub mod chargers;
pub mod health;
pub mod metrics;
pub mod partners;
pub mod request_id;
