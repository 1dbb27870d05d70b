use crate::core::context::RequestContext;
use crate::domain::model::Delivery;
use crate::domain::ports::DeliveryStore;
use crate::utils::error::{EntregadorError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Stores each delivery as `<base_path>/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileDeliveryStore {
    base_path: PathBuf,
}

impl JsonFileDeliveryStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn file_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    pub async fn get(&self, id: &str) -> Result<Option<Delivery>> {
        match tokio::fs::read(self.file_path(id)).await {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl DeliveryStore for JsonFileDeliveryStore {
    async fn create(&self, ctx: &RequestContext, delivery: &Delivery) -> Result<Delivery> {
        let persisted = delivery.stamped();
        let id = persisted
            .id
            .as_deref()
            .ok_or_else(|| EntregadorError::StoreError {
                message: "no identity assigned".to_string(),
            })?;

        tokio::fs::create_dir_all(&self.base_path).await?;

        let path = self.file_path(id);
        let json = serde_json::to_vec_pretty(&persisted)?;
        tracing::debug!(
            request_id = ctx.request_id(),
            path = %path.display(),
            "Writing delivery record ({} bytes)",
            json.len()
        );
        tokio::fs::write(&path, json).await?;

        Ok(persisted)
    }
}
