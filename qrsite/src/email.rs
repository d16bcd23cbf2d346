use anyhow::Context;
use qrsite_config::{Config, EmailProvider, Environment};
use qrsite_email_impl::{
    local::LocalEmailServiceImpl,
    resend::{ResendEmailServiceConfig, ResendEmailServiceImpl},
    smtp::SmtpEmailServiceImpl,
    EmailServiceImpl,
};
use qrsite_shared_impl::time::TimeServiceImpl;
use tracing::{error, info, warn};

use crate::environment::types::Email;

/// How contact emails are delivered, derived from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy<'a> {
    /// Resend HTTP API with the given api key.
    Resend(&'a str),
    /// SMTP server at the given url.
    Smtp(&'a str),
    /// Log emails instead of delivering them.
    Local,
    /// Refuse to deliver anything.
    Disabled,
}

impl<'a> Strategy<'a> {
    pub fn select(config: &'a Config) -> Self {
        let credential = match config.email.provider {
            EmailProvider::Resend => config
                .resend
                .api_key
                .as_deref()
                .filter(|api_key| !api_key.trim().is_empty())
                .map(Self::Resend),
            EmailProvider::Smtp => config.email.smtp_url.as_deref().map(Self::Smtp),
        };

        match (credential, config.environment) {
            (Some(strategy), _) => strategy,
            (None, Environment::Development) => Self::Local,
            (None, Environment::Production) => Self::Disabled,
        }
    }
}

/// Builds the email service for the configured strategy. Returns `None` if
/// no strategy is available.
pub fn connect(config: &Config) -> anyhow::Result<Option<Email>> {
    let email = match Strategy::select(config) {
        Strategy::Resend(api_key) => {
            info!("Delivering emails via the resend api");
            let resend_config = ResendEmailServiceConfig::new(
                api_key,
                config.resend.endpoint.clone(),
                config.resend.timeout.into(),
            );
            let resend = ResendEmailServiceImpl::new(resend_config)
                .context("Failed to create resend client")?;
            Some(EmailServiceImpl::Resend(resend))
        }
        Strategy::Smtp(url) => {
            info!("Delivering emails via smtp");
            let smtp = SmtpEmailServiceImpl::new(url).context("Failed to create smtp transport")?;
            Some(EmailServiceImpl::Smtp(smtp))
        }
        Strategy::Local => {
            warn!("No email credentials configured, emails will only be logged");
            Some(EmailServiceImpl::Local(LocalEmailServiceImpl::new(
                TimeServiceImpl,
            )))
        }
        Strategy::Disabled => {
            error!("No email credentials configured, contact submissions will be rejected");
            None
        }
    };

    Ok(email)
}
