use async_trait::async_trait;

use chrono::Utc;

use crate::client::EmailClient;
use crate::domain::EmailAddress;
use crate::repo::Lead;

use super::{compose, LeadNotifier};

/// Delivers staff alerts over SMTP
pub struct EmailLeadNotifier {
    client: EmailClient,
    recipient: EmailAddress,
}

impl EmailLeadNotifier {
    pub fn new(client: EmailClient, recipient: EmailAddress) -> Self {
        Self { client, recipient }
    }
}

#[async_trait]
impl LeadNotifier for EmailLeadNotifier {
    #[tracing::instrument(name = "Send lead notification", skip(self, lead))]
    async fn notify(&self, lead: &Lead) -> bool {
        // Send-time is stamped here, not read from the record
        let email = compose::lead_email(lead, Utc::now());

        match self.client.send(&self.recipient, &email).await {
            Ok(()) => {
                tracing::info!("Lead notification sent for: {}", lead.email);
                true
            }
            Err(e) => {
                tracing::error!("Failed to send lead notification: {:#}", e);
                false
            }
        }
    }
}
