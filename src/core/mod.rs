pub mod context;
pub mod message;
pub mod observer;
pub mod registration;

pub use crate::domain::model::{Delivery, DeliveryRequest, Occupant, Resident};
pub use crate::domain::ports::{DeliveryStore, NotificationSender, ResidentDirectory};
pub use crate::utils::error::Result;
