pub mod dto;
pub mod service;

pub use dto::{ChargerStatusSnapshot, ControlOutcome, ControlRequest};
pub use service::ChargerControlService;
