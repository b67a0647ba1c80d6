//! Contact form route

use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    error::{ApiError, ApiResult},
    extract::AppJson,
    validation::non_blank,
};

/// Contact form submission
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    /// Client-side timestamp, passed through to the log as-is
    #[serde(default)]
    pub ts: Option<serde_json::Value>,
}

/// A contact message with every required field present
#[derive(Debug, PartialEq)]
pub struct ContactMessage<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<ContactMessage<'_>, ApiError> {
        let missing = || ApiError::BadRequest("Missing fields".to_string());

        Ok(ContactMessage {
            name: non_blank(self.name.as_deref()).ok_or_else(missing)?,
            email: non_blank(self.email.as_deref()).ok_or_else(missing)?,
            subject: non_blank(self.subject.as_deref()).ok_or_else(missing)?,
            message: non_blank(self.message.as_deref()).ok_or_else(missing)?,
        })
    }
}

/// Accept a contact form message
#[instrument(skip_all)]
pub async fn submit(AppJson(payload): AppJson<ContactRequest>) -> ApiResult<StatusCode> {
    let contact = payload.validate()?;

    info!(
        name = contact.name,
        email = contact.email,
        subject = contact.subject,
        message = contact.message,
        ts = ?payload.ts,
        "Contact message received"
    );

    Ok(StatusCode::NO_CONTENT)
}
