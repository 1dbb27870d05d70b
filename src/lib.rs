pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod http;
pub mod utils;

pub use crate::app::build_registration;
pub use crate::config::AppConfig;
pub use crate::core::context::RequestContext;
pub use crate::core::registration::{
    DeliveryRegistration, NotificationOutcome, RecipientLookup, RegistrationReport,
};
pub use crate::domain::model::{Delivery, DeliveryRequest, Occupant, Resident};
pub use utils::error::{EntregadorError, Result};
