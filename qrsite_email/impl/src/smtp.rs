use anyhow::Context;
use lettre::{
    message::{Mailbox, MessageBuilder, MultiPart},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use qrsite_email_contracts::{Email, EmailSendError, EmailService, ProviderError, SentEmail};
use qrsite_utils::Apply;
use tracing::{error, warn};

/// Delivers emails through an SMTP relay.
///
/// SMTP does not hand out message ids, so successful sends never carry one.
#[derive(Debug, Clone)]
pub struct SmtpEmailServiceImpl {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailServiceImpl {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)
            .context("Invalid smtp url")?
            .build();

        Ok(Self { transport })
    }
}

impl EmailService for SmtpEmailServiceImpl {
    #[tracing::instrument(skip_all, fields(subject = %email.subject))]
    async fn send(&self, email: Email) -> Result<SentEmail, EmailSendError> {
        let message = build_message(email)?;

        match self.transport.send(message).await {
            Ok(_) => Ok(SentEmail { id: None }),
            Err(err) if err.is_permanent() || err.is_transient() => {
                error!("smtp server refused the email: {err}");
                Err(EmailSendError::Rejected(ProviderError {
                    message: Some(err.to_string()),
                    status_code: err.status().and_then(|code| code.to_string().parse().ok()),
                    name: None,
                }))
            }
            Err(err) => Err(anyhow::Error::new(err)
                .context("Failed to send email via smtp")
                .into()),
        }
    }
}

fn build_message(email: Email) -> anyhow::Result<Message> {
    let reply_to = email.reply_to.and_then(|reply_to| {
        reply_to
            .parse::<Mailbox>()
            .inspect_err(|err| warn!(%reply_to, "ignoring invalid reply-to address: {err}"))
            .ok()
    });

    let builder = Message::builder()
        .from(email.from.parse::<Mailbox>().context("Invalid sender address")?)
        .apply_map(reply_to, MessageBuilder::reply_to)
        .subject(email.subject);

    let builder = email
        .recipients
        .iter()
        .try_fold(builder, |builder, recipient| {
            let mailbox = recipient
                .parse::<Mailbox>()
                .with_context(|| format!("Invalid recipient address {recipient:?}"))?;
            anyhow::Ok(builder.to(mailbox))
        })?;

    builder
        .multipart(MultiPart::alternative_plain_html(email.text, email.html))
        .context("Failed to build email")
}
