use std::sync::Arc;

use anyhow::Context;
use qrsite_core_contact_contracts::{ContactFeatureService, ContactSubmitError, DeliveryRejection};
use qrsite_email_contracts::{Email, EmailSendError, EmailService};
use qrsite_models::contact::{ContactSubmission, SubmissionTicket};
use qrsite_shared_contracts::time::TimeService;
use qrsite_templates_contracts::{
    ContactNotification, ContactNotificationHtmlTemplate, ContactNotificationTextTemplate,
    TemplateService,
};
use tracing::{error, info, warn};


#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Time, Email, Template> {
    time: Time,
    /// `None` when no delivery strategy is available.
    email: Option<Email>,
    template: Template,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    pub from: Arc<str>,
    pub recipients: Arc<[String]>,
    pub subject_prefix: Arc<str>,
}

impl<Time, Email, Template> ContactFeatureServiceImpl<Time, Email, Template> {
    pub fn new(
        time: Time,
        email: Option<Email>,
        template: Template,
        config: ContactFeatureConfig,
    ) -> Self {
        Self {
            time,
            email,
            template,
            config,
        }
    }
}

impl<Time, EmailS, Template> ContactFeatureService
    for ContactFeatureServiceImpl<Time, EmailS, Template>
where
    Time: TimeService,
    EmailS: EmailService,
    Template: TemplateService,
{
    #[tracing::instrument(skip_all)]
    async fn submit(
        &self,
        submission: ContactSubmission,
    ) -> Result<SubmissionTicket, ContactSubmitError> {
        let message = submission.validate().inspect_err(|err| {
            info!(%err, "rejected contact submission");
        })?;

        let Some(email_service) = &self.email else {
            error!("Cannot deliver contact submission, no email service is configured");
            return Err(ContactSubmitError::Configuration);
        };

        let now = self.time.now();
        let notification = ContactNotification {
            name: message.name.into_inner(),
            email: message.email.into_inner(),
            subject: message.subject.into_inner(),
            message: message.message.into_inner(),
            timestamp: now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        };

        let html = self
            .template
            .render(&ContactNotificationHtmlTemplate(notification.clone()))
            .context("Failed to render html notification")?;
        let text = self
            .template
            .render(&ContactNotificationTextTemplate(notification.clone()))
            .context("Failed to render text notification")?;

        let email = Email {
            from: self.config.from.to_string(),
            recipients: self.config.recipients.to_vec(),
            subject: format!("{}{}", self.config.subject_prefix, notification.subject),
            html,
            text: text.trim().into(),
            reply_to: Some(notification.email),
        };

        let sent = email_service.send(email).await.map_err(|err| match err {
            EmailSendError::Rejected(provider) => {
                error!(%provider, "email provider rejected contact notification");
                ContactSubmitError::Delivery(DeliveryRejection {
                    message: provider.message,
                    status_code: provider.status_code,
                    name: provider.name,
                })
            }
            EmailSendError::Other(err) => {
                error!("Failed to send contact notification: {err:#}");
                ContactSubmitError::Transport(err.context("Failed to send contact notification"))
            }
        })?;

        let id = sent.id.unwrap_or_else(|| {
            warn!("email provider returned no id");
            format!("local-{}", now.timestamp_millis())
        });
        info!(%id, "delivered contact submission");

        Ok(SubmissionTicket {
            id,
            timestamp: now,
            submission,
        })
    }

    fn is_configured(&self) -> bool {
        self.email.is_some()
    }
}
