pub mod service;

pub use service::{CreatePartner, PartnerService};
