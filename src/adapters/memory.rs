use crate::core::context::RequestContext;
use crate::domain::model::{Delivery, Resident};
use crate::domain::ports::{DeliveryStore, ResidentDirectory};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryDeliveryStore {
    deliveries: RwLock<HashMap<String, Delivery>>,
}

impl MemoryDeliveryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<Delivery> {
        self.deliveries.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.deliveries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.deliveries.read().await.is_empty()
    }
}

#[async_trait]
impl DeliveryStore for MemoryDeliveryStore {
    async fn create(&self, _ctx: &RequestContext, delivery: &Delivery) -> Result<Delivery> {
        let persisted = delivery.stamped();
        let id = persisted.id.clone().unwrap_or_default();

        self.deliveries.write().await.insert(id, persisted.clone());
        Ok(persisted)
    }
}

/// Residents keyed by apartment number.
#[derive(Debug, Default)]
pub struct MemoryResidentDirectory {
    residents: RwLock<HashMap<String, Resident>>,
}

impl MemoryResidentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later entries replace earlier ones with the same apartment number.
    pub fn from_residents(residents: impl IntoIterator<Item = Resident>) -> Self {
        let residents = residents
            .into_iter()
            .map(|resident| (resident.apartment_number.clone(), resident))
            .collect();

        Self {
            residents: RwLock::new(residents),
        }
    }

    /// Inserts or replaces the record for `resident.apartment_number`.
    pub async fn upsert(&self, resident: Resident) {
        self.residents
            .write()
            .await
            .insert(resident.apartment_number.clone(), resident);
    }

    pub async fn remove(&self, apartment_number: &str) -> Option<Resident> {
        self.residents.write().await.remove(apartment_number)
    }

    pub async fn len(&self) -> usize {
        self.residents.read().await.len()
    }
}

#[async_trait]
impl ResidentDirectory for MemoryResidentDirectory {
    async fn find_by_apartment(
        &self,
        _ctx: &RequestContext,
        apartment_number: &str,
    ) -> Result<Option<Resident>> {
        Ok(self.residents.read().await.get(apartment_number).cloned())
    }
}
