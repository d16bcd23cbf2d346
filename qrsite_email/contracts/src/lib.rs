use std::future::Future;

use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Hands the email over to the delivery provider. Exactly one attempt is
    /// made, failures are never retried.
    fn send(&self, email: Email) -> impl Future<Output = Result<SentEmail, EmailSendError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentEmail {
    /// Identifier assigned by the provider, if it returned one.
    pub id: Option<String>,
}

#[derive(Debug, Error)]
pub enum EmailSendError {
    /// The provider answered with an error object instead of accepting the
    /// email.
    #[error("The email provider rejected the email: {0}")]
    Rejected(ProviderError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error details reported by the email provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderError {
    pub message: Option<String>,
    pub status_code: Option<u16>,
    pub name: Option<String>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message.as_deref().unwrap_or("unknown error"))?;
        if let Some(name) = &self.name {
            write!(f, " ({name})")?;
        }
        if let Some(status_code) = self.status_code {
            write!(f, " [{status_code}]")?;
        }
        Ok(())
    }
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(mut self, email: Email, result: Result<SentEmail, EmailSendError>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
