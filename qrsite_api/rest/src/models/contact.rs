use qrsite_models::contact::ContactSubmission;
use serde::{Deserialize, Serialize};

/// Missing fields are treated as empty strings and rejected by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl From<ApiContactSubmission> for ContactSubmission {
    fn from(value: ApiContactSubmission) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiContactSuccess {
    pub success: bool,
    pub message: &'static str,
    pub id: Option<String>,
}
