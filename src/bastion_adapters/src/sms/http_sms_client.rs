use std::time::Duration;

use bastion_core::{DeliveryChannel, DeliveryError, OutOfBandMessage};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

use crate::config::prod::sms_gateway::{AUTH_HEADER, MESSAGES_PATH};

/// Sends SMS codes through an HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpSmsClient {
    http_client: Client,
    base_url: Url,
    auth_token: Option<Secret<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum HttpSmsClientError {
    #[error("Invalid gateway url: {0}")]
    InvalidUrl(String),
    #[error("Failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    to: &'a str,
    text: String,
}

impl HttpSmsClient {
    pub fn new(
        base_url: &str,
        auth_token: Option<Secret<String>>,
        timeout: Duration,
    ) -> Result<Self, HttpSmsClientError> {
        let base_url = Url::parse(base_url)
            .and_then(|url| url.join(MESSAGES_PATH))
            .map_err(|e| HttpSmsClientError::InvalidUrl(e.to_string()))?;
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
            auth_token,
        })
    }
}

#[async_trait::async_trait]
impl DeliveryChannel for HttpSmsClient {
    #[tracing::instrument(name = "HttpSmsClient::deliver", skip_all)]
    async fn deliver(&self, message: &OutOfBandMessage) -> Result<(), DeliveryError> {
        let OutOfBandMessage::Sms { mobile, code } = message else {
            return Err(DeliveryError::Rejected(
                "SMS gateway only delivers SMS messages".to_string(),
            ));
        };

        let body = SendMessageRequest {
            to: mobile.as_ref().expose_secret(),
            text: format!(
                "Your verification code is {}",
                code.as_ref().expose_secret()
            ),
        };

        let mut request = self.http_client.post(self.base_url.clone()).json(&body);
        if let Some(token) = &self.auth_token {
            request = request.header(AUTH_HEADER, token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError::Unreachable(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| DeliveryError::Rejected(e.to_string()))?;

        tracing::debug!(mobile = %mobile.masked(), "Verification SMS accepted by gateway");
        Ok(())
    }
}
