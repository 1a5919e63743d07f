use std::sync::Arc;

use bastion_core::{DeliveryChannel, DeliveryError, OutOfBandMessage};
use tokio::sync::RwLock;

/// Delivery channel that only logs and remembers what it was asked to send.
///
/// Used when no SMS gateway is configured, and in tests to read back codes.
#[derive(Debug, Clone, Default)]
pub struct MockSmsClient {
    sent: Arc<RwLock<Vec<OutOfBandMessage>>>,
}

impl MockSmsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<OutOfBandMessage> {
        self.sent.read().await.clone()
    }

    pub async fn last(&self) -> Option<OutOfBandMessage> {
        self.sent.read().await.last().cloned()
    }
}

#[async_trait::async_trait]
impl DeliveryChannel for MockSmsClient {
    #[tracing::instrument(name = "MockSmsClient::deliver", skip_all)]
    async fn deliver(&self, message: &OutOfBandMessage) -> Result<(), DeliveryError> {
        match message {
            OutOfBandMessage::Sms { mobile, .. } => {
                tracing::info!(mobile = %mobile.masked(), "Pretending to send verification SMS");
            }
            OutOfBandMessage::Custom { .. } => {
                tracing::info!("Pretending to deliver custom verification code");
            }
        }
        self.sent.write().await.push(message.clone());
        Ok(())
    }
}
