use crate::client::{ContactApiClient, SubmissionResult};
use crate::fields::{ContactFormFields, FormField, SubmissionPayload};

pub const SUCCESS_MESSAGE: &str = "Message sent successfully! We'll get back to you within 24 hours.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// Feedback shown above the form after a submission settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitStatus {
    pub kind: StatusKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ContactForm {
    fields: ContactFormFields,
    verification_token: Option<String>,
    is_submitting: bool,
    submit_status: Option<SubmitStatus>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &ContactFormFields {
        &self.fields
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.fields.set(field, value.into());
    }

    /// Stores the proof-of-humanity token handed over by the challenge widget.
    pub fn set_verification_token(&mut self, token: impl Into<String>) {
        self.verification_token = Some(token.into());
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn submit_status(&self) -> Option<&SubmitStatus> {
        self.submit_status.as_ref()
    }

    /// Whether the submit control should accept clicks. This is the only
    /// guard against double submission.
    pub fn submit_enabled(&self) -> bool {
        !self.is_submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting {
            "Sending..."
        } else {
            "Send Message"
        }
    }

    /// Marks the form as in flight and serializes the current fields.
    ///
    /// Calling this again before [`ContactForm::settle`] is not refused; it
    /// simply produces another payload.
    pub fn begin_submission(&mut self) -> SubmissionPayload {
        self.is_submitting = true;
        self.submit_status = None;
        self.fields.to_payload(self.verification_token.clone())
    }

    /// Applies the outcome of a request started with
    /// [`ContactForm::begin_submission`].
    pub fn settle<E: std::fmt::Display>(&mut self, outcome: Result<SubmissionResult, E>) {
        self.submit_status = Some(match outcome {
            Ok(SubmissionResult { ok: true, .. }) => {
                self.fields = ContactFormFields::default();
                SubmitStatus {
                    kind: StatusKind::Success,
                    message: SUCCESS_MESSAGE.to_string(),
                }
            }
            Ok(SubmissionResult { ok: false, message }) => SubmitStatus {
                kind: StatusKind::Error,
                message,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Contact form request did not complete");
                SubmitStatus {
                    kind: StatusKind::Error,
                    message: NETWORK_ERROR_MESSAGE.to_string(),
                }
            }
        });
        // Challenge tokens are single use.
        self.verification_token = None;
        self.is_submitting = false;
    }

    pub async fn submit(&mut self, client: &ContactApiClient) {
        let payload = self.begin_submission();
        let outcome = client.send(&payload).await;
        self.settle(outcome);
    }
}
