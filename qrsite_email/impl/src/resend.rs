use std::{sync::Arc, time::Duration};

use anyhow::Context;
use qrsite_email_contracts::{Email, EmailSendError, EmailService, ProviderError, SentEmail};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::http::HttpClient;

pub const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Delivers emails through the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct ResendEmailServiceImpl {
    config: ResendEmailServiceConfig,
    client: HttpClient,
}

#[derive(Clone)]
pub struct ResendEmailServiceConfig {
    endpoint: Arc<Url>,
    api_key: Arc<str>,
    timeout: Duration,
}

impl ResendEmailServiceConfig {
    pub fn new(api_key: &str, endpoint_override: Option<Url>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint_override
                .unwrap_or_else(|| RESEND_ENDPOINT.parse().unwrap())
                .into(),
            api_key: api_key.into(),
            timeout,
        }
    }
}

impl std::fmt::Debug for ResendEmailServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendEmailServiceConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[redacted]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ResendEmailServiceImpl {
    pub fn new(config: ResendEmailServiceConfig) -> anyhow::Result<Self> {
        let client = HttpClient::new(config.timeout)?;
        Ok(Self { config, client })
    }
}

impl EmailService for ResendEmailServiceImpl {
    #[tracing::instrument(skip_all, fields(subject = %email.subject))]
    async fn send(&self, email: Email) -> Result<SentEmail, EmailSendError> {
        let response = self
            .client
            .post((*self.config.endpoint).clone())
            .bearer_auth(&*self.config.api_key)
            .json(&SendRequest::from(&email))
            .send()
            .await
            .context("Failed to reach the resend api")?;

        let status = response.status();
        if status.is_success() {
            let response = response
                .json::<SendResponse>()
                .await
                .context("Failed to parse resend api response")?;
            let id = response.id.or(response.data.and_then(|data| data.id));
            debug!(?id, "email accepted by resend");
            return Ok(SentEmail { id });
        }

        let body = response.text().await.unwrap_or_default();
        error!(%status, %body, "resend api returned an error");
        let error = serde_json::from_str::<ErrorResponse>(&body).unwrap_or_default();
        Err(EmailSendError::Rejected(ProviderError {
            message: error.message,
            status_code: error.status_code.or(Some(status.as_u16())),
            name: error.name,
        }))
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

impl<'a> From<&'a Email> for SendRequest<'a> {
    fn from(email: &'a Email) -> Self {
        Self {
            from: &email.from,
            to: &email.recipients,
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
            reply_to: email.reply_to.as_deref(),
        }
    }
}

#[derive(Deserialize)]
struct SendResponse {
    id: Option<String>,
    data: Option<SendResponseData>,
}

#[derive(Deserialize)]
struct SendResponseData {
    id: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    message: Option<String>,
    status_code: Option<u16>,
    name: Option<String>,
}
