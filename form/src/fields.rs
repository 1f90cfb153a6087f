use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Company,
    Service,
    Message,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormFields {
    pub name: String,
    pub email: String,
    pub company: String,
    pub service: String,
    pub message: String,
}

/// Body of `POST /api/contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ContactFormFields {
    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Company => &mut self.company,
            FormField::Service => &mut self.service,
            FormField::Message => &mut self.message,
        };
        *slot = value;
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Company => &self.company,
            FormField::Service => &self.service,
            FormField::Message => &self.message,
        }
    }

    /// The endpoint has no company or service fields, so both are folded into
    /// the subject and the message body.
    pub fn to_payload(&self, token: Option<String>) -> SubmissionPayload {
        SubmissionPayload {
            name: self.name.clone(),
            email: self.email.clone(),
            subject: format!("{} - {}", self.service, self.company),
            message: format!(
                "Company: {}\nService: {}\n\nMessage:\n{}",
                self.company, self.service, self.message
            ),
            token,
        }
    }
}
