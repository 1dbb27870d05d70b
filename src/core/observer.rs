use crate::core::context::RequestContext;
use crate::core::registration::{NotificationOutcome, RecipientLookup, RegistrationReport};
use crate::domain::model::{Delivery, Occupant};
use crate::utils::error::EntregadorError;
use crate::utils::logger::mask_text;

/// What happened at each stage boundary of one registration.
#[derive(Debug)]
pub enum RegistrationEvent<'a> {
    Started {
        delivery: &'a Delivery,
    },
    Persisted {
        delivery: &'a Delivery,
    },
    PersistenceFailed {
        delivery: &'a Delivery,
        error: &'a EntregadorError,
    },
    RecipientResolved {
        delivery: &'a Delivery,
        occupant: &'a Occupant,
    },
    RecipientUnavailable {
        delivery: &'a Delivery,
        lookup: &'a RecipientLookup,
    },
    NotificationSent {
        delivery: &'a Delivery,
        phone: &'a str,
    },
    NotificationFailed {
        delivery: &'a Delivery,
        phone: &'a str,
        error: &'a EntregadorError,
    },
    Completed {
        report: &'a RegistrationReport,
    },
}

/// Logging hook injected into the registration workflow.
pub trait RegistrationObserver: Send + Sync {
    fn on_event(&self, ctx: &RequestContext, event: &RegistrationEvent<'_>);
}

/// Default observer: structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RegistrationObserver for TracingObserver {
    fn on_event(&self, ctx: &RequestContext, event: &RegistrationEvent<'_>) {
        let request_id = ctx.request_id();

        match event {
            RegistrationEvent::Started { delivery } => {
                tracing::info!(
                    request_id,
                    apartment = %delivery.apartment_number,
                    package_type = %delivery.package_type,
                    "Registering delivery"
                );
            }
            RegistrationEvent::Persisted { delivery } => {
                tracing::info!(
                    request_id,
                    apartment = %delivery.apartment_number,
                    delivery_id = delivery.id().unwrap_or_default(),
                    "Delivery persisted"
                );
            }
            RegistrationEvent::PersistenceFailed { delivery, error } => {
                tracing::error!(
                    request_id,
                    apartment = %delivery.apartment_number,
                    error = %error,
                    "Failed to persist delivery"
                );
            }
            RegistrationEvent::RecipientResolved { delivery, occupant } => {
                tracing::info!(
                    request_id,
                    apartment = %delivery.apartment_number,
                    delivery_id = delivery.id().unwrap_or_default(),
                    occupant = %mask_text(&occupant.name),
                    phone = %occupant.phone,
                    "Recipient resolved, preparing message"
                );
            }
            RegistrationEvent::RecipientUnavailable { delivery, lookup } => match lookup {
                RecipientLookup::LookupFailed(error) => {
                    tracing::warn!(
                        request_id,
                        apartment = %delivery.apartment_number,
                        delivery_id = delivery.id().unwrap_or_default(),
                        error = %error,
                        "Resident lookup failed, continuing without notification"
                    );
                }
                RecipientLookup::NotFound => {
                    tracing::warn!(
                        request_id,
                        apartment = %delivery.apartment_number,
                        delivery_id = delivery.id().unwrap_or_default(),
                        "No resident registered for apartment"
                    );
                }
                RecipientLookup::NoOccupants => {
                    tracing::warn!(
                        request_id,
                        apartment = %delivery.apartment_number,
                        delivery_id = delivery.id().unwrap_or_default(),
                        "Resident has no occupants to notify"
                    );
                }
                RecipientLookup::Found(_) => {}
            },
            RegistrationEvent::NotificationSent { delivery, phone } => {
                tracing::info!(
                    request_id,
                    apartment = %delivery.apartment_number,
                    delivery_id = delivery.id().unwrap_or_default(),
                    phone,
                    "Notification sent"
                );
            }
            RegistrationEvent::NotificationFailed {
                delivery,
                phone,
                error,
            } => {
                tracing::warn!(
                    request_id,
                    apartment = %delivery.apartment_number,
                    delivery_id = delivery.id().unwrap_or_default(),
                    phone,
                    error = %error,
                    "Notification failed, delivery already registered"
                );
            }
            RegistrationEvent::Completed { report } => {
                tracing::info!(
                    request_id,
                    apartment = %report.delivery.apartment_number,
                    delivery_id = report.delivery.id().unwrap_or_default(),
                    notified = matches!(report.notification, NotificationOutcome::Sent { .. }),
                    "Delivery registered"
                );
            }
        }
    }
}
