//! Charger aggregate
//!
//! Contains the Charger entity, the control state machine and the
//! repository interface.

pub mod model;
pub mod repository;
pub mod state_machine;

pub use model::{Charger, ChargerConfiguration, ChargerStatus, Location, NewCharger};
pub use repository::ChargerRepository;
pub use state_machine::{ChargerAction, TransitionDecision};
