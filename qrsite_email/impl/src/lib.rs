use qrsite_email_contracts::{Email, EmailSendError, EmailService, SentEmail};
use qrsite_shared_contracts::time::TimeService;

pub mod http;
pub mod local;
pub mod resend;
pub mod smtp;

use local::LocalEmailServiceImpl;
use resend::ResendEmailServiceImpl;
use smtp::SmtpEmailServiceImpl;

/// The delivery strategy chosen from the configuration at startup.
#[derive(Debug, Clone)]
pub enum EmailServiceImpl<Time> {
    Resend(ResendEmailServiceImpl),
    Smtp(SmtpEmailServiceImpl),
    Local(LocalEmailServiceImpl<Time>),
}

impl<Time> EmailService for EmailServiceImpl<Time>
where
    Time: TimeService,
{
    async fn send(&self, email: Email) -> Result<SentEmail, EmailSendError> {
        match self {
            Self::Resend(resend) => resend.send(email).await,
            Self::Smtp(smtp) => smtp.send(email).await,
            Self::Local(local) => local.send(email).await,
        }
    }
}
