use crate::core::context::RequestContext;
use crate::domain::ports::NotificationSender;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSender;

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send(&self, ctx: &RequestContext, destination: &str, message: &str) -> Result<()> {
        tracing::info!(
            request_id = ctx.request_id(),
            to = destination,
            "Notification (not delivered): {}",
            message
        );
        Ok(())
    }
}
