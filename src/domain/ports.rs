use crate::core::context::RequestContext;
use crate::domain::model::{Delivery, Resident};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Durable persistence of delivery records.
#[async_trait]
pub trait DeliveryStore: Send + Sync {
    /// Persists `delivery` and returns it with identity and both timestamps assigned.
    async fn create(&self, ctx: &RequestContext, delivery: &Delivery) -> Result<Delivery>;
}

/// Lookup of apartment occupants.
#[async_trait]
pub trait ResidentDirectory: Send + Sync {
    /// `Ok(None)` when the apartment has no resident record.
    async fn find_by_apartment(
        &self,
        ctx: &RequestContext,
        apartment_number: &str,
    ) -> Result<Option<Resident>>;
}

/// Best-effort outbound messaging.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, ctx: &RequestContext, destination: &str, message: &str) -> Result<()>;
}
