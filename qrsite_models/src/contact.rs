use chrono::{DateTime, Utc};
use nutype::nutype;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{validate_email, MESSAGE_LIMIT, NAME_LIMIT, SUBJECT_LIMIT};

/// Contact form input exactly as submitted by the user.
///
/// Missing fields deserialize as empty strings so they are reported by
/// [`ContactSubmission::validate`] like any other invalid value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A contact submission whose fields passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: ContactName,
    pub email: ContactEmail,
    pub subject: ContactSubject,
    pub message: ContactMessageBody,
}

/// Receipt for a submission that has been handed over for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionTicket {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub submission: ContactSubmission,
}

#[nutype(
    validate(predicate = |name: &str| NAME_LIMIT.check(name)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactName(String);

#[nutype(
    validate(predicate = |email: &str| validate_email(email)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactEmail(String);

#[nutype(
    validate(predicate = |subject: &str| SUBJECT_LIMIT.check(subject)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactSubject(String);

#[nutype(
    validate(predicate = |message: &str| MESSAGE_LIMIT.check(message)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageBody(String);

/// The first contact form field that failed validation.
///
/// The display representation is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactFieldError {
    #[error("El nombre debe tener entre 2 y 100 caracteres")]
    Name,
    #[error("Dirección de correo inválida")]
    Email,
    #[error("El asunto debe tener entre 5 y 200 caracteres")]
    Subject,
    #[error("El mensaje debe tener entre 10 y 1000 caracteres")]
    Message,
}

impl ContactSubmission {
    /// Validates the fields in the order name, email, subject, message and
    /// stops at the first violation.
    pub fn validate(&self) -> Result<ContactMessage, ContactFieldError> {
        Ok(ContactMessage {
            name: ContactName::try_new(self.name.clone()).map_err(|_| ContactFieldError::Name)?,
            email: ContactEmail::try_new(self.email.clone())
                .map_err(|_| ContactFieldError::Email)?,
            subject: ContactSubject::try_new(self.subject.clone())
                .map_err(|_| ContactFieldError::Subject)?,
            message: ContactMessageBody::try_new(self.message.clone())
                .map_err(|_| ContactFieldError::Message)?,
        })
    }
}
