//! Partner aggregate

pub mod model;
pub mod repository;

pub use model::{
    NewPartner, Partner, PartnerFilter, PartnerSettings, PartnerStatistics, PartnerStatus,
    PartnerUpdate, DEFAULT_MAX_CHARGERS,
};
pub use repository::PartnerRepository;
