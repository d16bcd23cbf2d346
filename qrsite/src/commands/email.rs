use anyhow::{anyhow, Context};
use clap::Subcommand;
use qrsite_config::Config;
use qrsite_email_contracts::{Email, EmailSendError, EmailService};
use tracing::info;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test {
        /// Send to this address instead of the configured recipients
        recipient: Option<String>,
    },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: Option<String>) -> anyhow::Result<()> {
    let email_service = email::connect(&config)?
        .context("No email delivery strategy is configured")?;

    let recipients = match recipient {
        Some(recipient) => vec![recipient],
        None => config.contact.recipients,
    };

    let sent = email_service
        .send(Email {
            from: config.contact.from,
            recipients,
            subject: "Email Deliverability Test".into(),
            html: "<p>Email deliverability seems to be working!</p>".into(),
            text: "Email deliverability seems to be working!".into(),
            reply_to: None,
        })
        .await
        .map_err(|err| match err {
            EmailSendError::Rejected(provider) => {
                anyhow!("The email provider rejected the email: {provider}")
            }
            EmailSendError::Other(err) => err.context("Failed to send email"),
        })?;

    info!(id = ?sent.id, "Email sent");
    println!("{}", sent.id.as_deref().unwrap_or("ok"));

    Ok(())
}
