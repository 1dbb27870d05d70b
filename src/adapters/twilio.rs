use crate::core::context::RequestContext;
use crate::domain::ports::NotificationSender;
use crate::utils::error::{EntregadorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.twilio.com";

#[derive(Debug, Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number in E.164 form, without the `whatsapp:` prefix.
    pub from: String,
}

/// Sends WhatsApp messages through the Twilio Messages API.
#[derive(Debug, Clone)]
pub struct TwilioWhatsAppSender {
    client: Client,
    api_base_url: String,
    credentials: TwilioCredentials,
}

impl TwilioWhatsAppSender {
    pub fn new(credentials: TwilioCredentials) -> Result<Self> {
        Self::with_base_url(credentials, DEFAULT_API_BASE_URL, Duration::from_secs(10))
    }

    pub fn with_base_url(
        credentials: TwilioCredentials,
        api_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base_url, self.credentials.account_sid
        )
    }
}

fn whatsapp_address(number: &str) -> String {
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{}", number)
    }
}

#[async_trait]
impl NotificationSender for TwilioWhatsAppSender {
    async fn send(&self, ctx: &RequestContext, destination: &str, message: &str) -> Result<()> {
        let to = whatsapp_address(destination);
        let from = whatsapp_address(&self.credentials.from);

        tracing::debug!(
            request_id = ctx.request_id(),
            to = %to,
            "Sending WhatsApp message via Twilio"
        );

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .form(&[("To", to.as_str()), ("From", from.as_str()), ("Body", message)])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Twilio response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EntregadorError::NotificationError {
                message: format!("failed to send WhatsApp message ({}): {}", status, body),
            });
        }

        Ok(())
    }
}
