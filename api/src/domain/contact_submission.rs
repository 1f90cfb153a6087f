use crate::domain::contact_email::ContactEmail;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The `{0}` field is missing or empty")]
    MissingField(&'static str),
    #[error("{0}")]
    InvalidEmail(String),
}

/// A contact message whose fields have all been checked.
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub name: String,
    pub email: ContactEmail,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    /// Presence of every field is checked before the shape of the email, so an
    /// empty email reports a missing field rather than a malformed address.
    /// Only absent or zero-length values count as missing.
    pub fn parse(
        name: Option<String>,
        email: Option<String>,
        subject: Option<String>,
        message: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = required("name", name)?;
        let email = required("email", email)?;
        let subject = required("subject", subject)?;
        let message = required("message", message)?;

        let email = ContactEmail::parse(email).map_err(ValidationError::InvalidEmail)?;

        Ok(Self {
            name,
            email,
            subject,
            message,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ValidationError::MissingField(field)),
    }
}
