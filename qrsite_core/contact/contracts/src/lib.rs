use std::future::Future;

use qrsite_models::contact::{ContactFieldError, ContactSubmission, SubmissionTicket};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Validates the submission and forwards it to the site owner by email.
    ///
    /// Every call that passes validation results in exactly one delivery
    /// attempt. Identical submissions are not deduplicated.
    fn submit(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<SubmissionTicket, ContactSubmitError>> + Send;

    /// Whether a delivery strategy is available.
    fn is_configured(&self) -> bool;
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    /// A field violates its constraint. Carries the first violation only.
    #[error(transparent)]
    Validation(#[from] ContactFieldError),
    /// No delivery strategy is configured.
    #[error("Email service is not configured")]
    Configuration,
    /// The email provider rejected the email.
    #[error("The email provider rejected the email")]
    Delivery(DeliveryRejection),
    /// The email provider could not be reached or did not answer.
    #[error("Failed to send email. Please try again later.")]
    Transport(#[source] anyhow::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error details reported by the email provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryRejection {
    pub message: Option<String>,
    pub status_code: Option<u16>,
    pub name: Option<String>,
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit(
        mut self,
        submission: ContactSubmission,
        result: Result<SubmissionTicket, ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_is_configured(mut self, configured: bool) -> Self {
        self.expect_is_configured().return_const(configured);
        self
    }
}
