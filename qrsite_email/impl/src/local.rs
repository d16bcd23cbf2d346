use qrsite_email_contracts::{Email, EmailSendError, EmailService, SentEmail};
use qrsite_shared_contracts::time::TimeService;
use tracing::info;

/// Delivery strategy for development setups without provider credentials.
///
/// Nothing leaves the process, the email is only logged and acknowledged with
/// a locally generated id of the form `local-<unix millis>`.
#[derive(Debug, Clone)]
pub struct LocalEmailServiceImpl<Time> {
    time: Time,
}

impl<Time> LocalEmailServiceImpl<Time> {
    pub fn new(time: Time) -> Self {
        Self { time }
    }
}

impl<Time> EmailService for LocalEmailServiceImpl<Time>
where
    Time: TimeService,
{
    #[tracing::instrument(skip_all, fields(subject = %email.subject))]
    async fn send(&self, email: Email) -> Result<SentEmail, EmailSendError> {
        let id = format!("local-{}", self.time.now().timestamp_millis());
        info!(
            %id,
            from = %email.from,
            to = ?email.recipients,
            reply_to = ?email.reply_to,
            "email not delivered, no provider configured:\n{}",
            email.text
        );
        Ok(SentEmail { id: Some(id) })
    }
}
