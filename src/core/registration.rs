use crate::core::context::{RequestContext, Stage};
use crate::core::message::{select_recipient, MessageTemplate};
use crate::core::observer::{RegistrationEvent, RegistrationObserver, TracingObserver};
use crate::domain::model::{Delivery, Occupant};
use crate::domain::ports::{DeliveryStore, NotificationSender, ResidentDirectory};
use crate::utils::error::{EntregadorError, Result};
use std::sync::Arc;

/// Outcome of the recipient-resolution stage.
#[derive(Debug)]
pub enum RecipientLookup {
    Found(Occupant),
    /// The apartment has no resident record.
    NotFound,
    /// A resident record exists but lists nobody.
    NoOccupants,
    LookupFailed(EntregadorError),
}

impl RecipientLookup {
    pub fn occupant(&self) -> Option<&Occupant> {
        match self {
            RecipientLookup::Found(occupant) => Some(occupant),
            _ => None,
        }
    }
}

/// Outcome of the best-effort notification stage.
#[derive(Debug)]
pub enum NotificationOutcome {
    Sent { phone: String },
    /// No recipient was resolved, so nothing was sent.
    Skipped,
    Failed { phone: String, error: EntregadorError },
}

/// Terminal state of a successful registration.
#[derive(Debug)]
pub struct RegistrationReport {
    pub delivery: Delivery,
    pub recipient: RecipientLookup,
    pub notification: NotificationOutcome,
}

impl RegistrationReport {
    pub fn notified(&self) -> bool {
        matches!(self.notification, NotificationOutcome::Sent { .. })
    }
}

/// Registers a delivery and notifies the apartment's first occupant.
///
/// Persist, resolve and notify run strictly in that order. Only a failed persist
/// aborts; lookup and send failures are reported to the observer and absorbed.
pub struct DeliveryRegistration {
    store: Arc<dyn DeliveryStore>,
    directory: Arc<dyn ResidentDirectory>,
    sender: Arc<dyn NotificationSender>,
    template: MessageTemplate,
    observer: Arc<dyn RegistrationObserver>,
}

impl DeliveryRegistration {
    pub fn new(
        store: Arc<dyn DeliveryStore>,
        directory: Arc<dyn ResidentDirectory>,
        sender: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            store,
            directory,
            sender,
            template: MessageTemplate::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_template(mut self, template: MessageTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RegistrationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn template(&self) -> &MessageTemplate {
        &self.template
    }

    pub async fn execute(&self, ctx: &RequestContext, delivery: Delivery) -> Result<Delivery> {
        self.execute_with_report(ctx, delivery)
            .await
            .map(|report| report.delivery)
    }

    pub async fn execute_with_report(
        &self,
        ctx: &RequestContext,
        delivery: Delivery,
    ) -> Result<RegistrationReport> {
        self.observer
            .on_event(ctx, &RegistrationEvent::Started { delivery: &delivery });

        let delivery = self.persist(ctx, &delivery).await?;
        let recipient = self.resolve_recipient(ctx, &delivery).await;
        let notification = match recipient.occupant() {
            Some(occupant) => self.notify(ctx, &delivery, occupant).await,
            None => NotificationOutcome::Skipped,
        };

        let report = RegistrationReport {
            delivery,
            recipient,
            notification,
        };
        self.observer
            .on_event(ctx, &RegistrationEvent::Completed { report: &report });

        Ok(report)
    }

    // Only checked at stage start. A store call already in flight is awaited to
    // completion, so a write is never reported as failed after it landed.
    async fn persist(&self, ctx: &RequestContext, delivery: &Delivery) -> Result<Delivery> {
        let result = match ctx.ensure_active(Stage::Persist) {
            Ok(()) => self.store.create(ctx, delivery).await,
            Err(error) => Err(error),
        };
        let result = result.and_then(|persisted| {
            if persisted.is_persisted() {
                Ok(persisted)
            } else {
                Err(EntregadorError::StoreError {
                    message: "store returned a delivery without identity or timestamps"
                        .to_string(),
                })
            }
        });

        match result {
            Ok(persisted) => {
                self.observer.on_event(
                    ctx,
                    &RegistrationEvent::Persisted {
                        delivery: &persisted,
                    },
                );
                Ok(persisted)
            }
            Err(error) => {
                self.observer.on_event(
                    ctx,
                    &RegistrationEvent::PersistenceFailed {
                        delivery,
                        error: &error,
                    },
                );
                Err(EntregadorError::persistence(error))
            }
        }
    }

    async fn resolve_recipient(&self, ctx: &RequestContext, delivery: &Delivery) -> RecipientLookup {
        let lookup = match ctx
            .guard(
                Stage::ResolveRecipient,
                self.directory
                    .find_by_apartment(ctx, &delivery.apartment_number),
            )
            .await
        {
            Ok(Some(resident)) => match select_recipient(&resident) {
                Some(occupant) => RecipientLookup::Found(occupant.clone()),
                None => RecipientLookup::NoOccupants,
            },
            Ok(None) => RecipientLookup::NotFound,
            Err(error) => RecipientLookup::LookupFailed(error),
        };

        let event = match &lookup {
            RecipientLookup::Found(occupant) => {
                RegistrationEvent::RecipientResolved { delivery, occupant }
            }
            other => RegistrationEvent::RecipientUnavailable {
                delivery,
                lookup: other,
            },
        };
        self.observer.on_event(ctx, &event);

        lookup
    }

    async fn notify(
        &self,
        ctx: &RequestContext,
        delivery: &Delivery,
        occupant: &Occupant,
    ) -> NotificationOutcome {
        let message = self.template.render(&occupant.name);
        let phone = occupant.phone.as_str();

        match ctx
            .guard(Stage::Notify, self.sender.send(ctx, phone, &message))
            .await
        {
            Ok(()) => {
                self.observer
                    .on_event(ctx, &RegistrationEvent::NotificationSent { delivery, phone });
                NotificationOutcome::Sent {
                    phone: phone.to_string(),
                }
            }
            Err(error) => {
                self.observer.on_event(
                    ctx,
                    &RegistrationEvent::NotificationFailed {
                        delivery,
                        phone,
                        error: &error,
                    },
                );
                NotificationOutcome::Failed {
                    phone: phone.to_string(),
                    error,
                }
            }
        }
    }
}
