// Application layer: assembles adapters and the registration workflow from configuration.

use crate::adapters::{
    load_residents_file, JsonFileDeliveryStore, LogNotificationSender, MemoryDeliveryStore,
    MemoryResidentDirectory, TwilioWhatsAppSender,
};
use crate::config::{AppConfig, NotifierKind, StoreKind};
use crate::core::message::MessageTemplate;
use crate::core::registration::DeliveryRegistration;
use crate::domain::ports::{DeliveryStore, NotificationSender, ResidentDirectory};
use crate::utils::error::{EntregadorError, Result};
use std::sync::Arc;

pub fn build_store(config: &AppConfig) -> Result<Arc<dyn DeliveryStore>> {
    match config.store.r#type {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory delivery store, records are lost on restart");
            Ok(Arc::new(MemoryDeliveryStore::new()))
        }
        StoreKind::JsonFile => {
            let path = config
                .store
                .path
                .as_deref()
                .ok_or_else(|| EntregadorError::MissingConfigError {
                    field: "store.path".to_string(),
                })?;
            tracing::info!("Using JSON file delivery store at {}", path);
            Ok(Arc::new(JsonFileDeliveryStore::new(path)))
        }
    }
}

pub fn build_directory(config: &AppConfig) -> Result<Arc<dyn ResidentDirectory>> {
    match &config.directory.residents_file {
        Some(path) => Ok(Arc::new(load_residents_file(path)?)),
        None => {
            tracing::warn!("No residents file configured, nobody will be notified");
            Ok(Arc::new(MemoryResidentDirectory::new()))
        }
    }
}

pub fn build_sender(config: &AppConfig) -> Result<Arc<dyn NotificationSender>> {
    match config.notifier.r#type {
        NotifierKind::Log => Ok(Arc::new(LogNotificationSender)),
        NotifierKind::Twilio => {
            let sender = TwilioWhatsAppSender::with_base_url(
                config.notifier.twilio_credentials()?,
                config.notifier.api_base_url.clone(),
                config.notifier.timeout(),
            )?;
            Ok(Arc::new(sender))
        }
    }
}

pub fn build_registration(config: &AppConfig) -> Result<DeliveryRegistration> {
    let registration = DeliveryRegistration::new(
        build_store(config)?,
        build_directory(config)?,
        build_sender(config)?,
    )
    .with_template(MessageTemplate::new(
        config.registration.message_template.clone(),
    ));

    Ok(registration)
}
