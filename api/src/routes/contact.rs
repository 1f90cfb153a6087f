use crate::domain::contact_submission::{ContactSubmission, ValidationError};
use crate::domain::mail_dispatcher::MailDispatcher;
use crate::domain::mail_transport::DispatchError;
use crate::domain::token_verifier::{verify_submission_token, TokenVerifier, VerificationError};
use crate::utils::error_chain_fmt;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SUCCESS_MESSAGE: &str = "Email sent successfully!";
const GENERIC_FAILURE_MESSAGE: &str = "Failed to send message. Please try again.";

#[derive(thiserror::Error)]
pub enum ContactError {
    #[error("The request body could not be parsed: {0}")]
    MalformedRequest(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl std::fmt::Debug for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ContactError {
    /// The text shown to the visitor. Never carries provider or configuration details.
    pub fn user_message(&self) -> &'static str {
        match self {
            ContactError::MalformedRequest(_) => "Invalid request body",
            ContactError::Validation(ValidationError::MissingField(_)) => "All fields are required",
            ContactError::Validation(ValidationError::InvalidEmail(_)) => {
                "Please provide a valid email address"
            }
            ContactError::Verification(VerificationError::MissingToken) => {
                "Please complete the verification challenge"
            }
            ContactError::Verification(VerificationError::Rejected(_)) => {
                "Verification failed, please try again"
            }
            ContactError::Verification(VerificationError::Unavailable(_)) => GENERIC_FAILURE_MESSAGE,
            ContactError::Dispatch(DispatchError::Authentication(_)) => "Email configuration error",
            ContactError::Dispatch(DispatchError::Transport(_)) => "Network error, please try again",
            ContactError::Dispatch(DispatchError::Delivery(_)) => GENERIC_FAILURE_MESSAGE,
        }
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::MalformedRequest(_) | ContactError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ContactError::Verification(VerificationError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ContactError::Verification(_) => StatusCode::BAD_REQUEST,
            ContactError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.user_message(),
        })
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

#[derive(Serialize)]
struct SuccessBody {
    message: &'static str,
}

/// Every field is optional here so that an absent field is reported as a
/// missing field rather than as an unparseable body.
#[derive(Deserialize, Debug, Default)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub token: Option<String>,
}

/// Validation, then verification when enabled, then delivery. The first
/// failing stage ends the submission.
pub struct ContactPipeline {
    dispatcher: MailDispatcher,
    verifier: Option<Arc<dyn TokenVerifier>>,
}

impl ContactPipeline {
    pub fn new(dispatcher: MailDispatcher, verifier: Option<Arc<dyn TokenVerifier>>) -> Self {
        Self {
            dispatcher,
            verifier,
        }
    }

    #[tracing::instrument(
        name = "Processing a contact submission",
        skip(self, payload),
        fields(sender_email = tracing::field::Empty),
        err(Debug)
    )]
    pub async fn submit(&self, payload: ContactPayload) -> Result<(), ContactError> {
        let ContactPayload {
            name,
            email,
            subject,
            message,
            token,
        } = payload;

        let submission = ContactSubmission::parse(name, email, subject, message)?;
        tracing::Span::current().record("sender_email", submission.email.inner());

        if let Some(verifier) = &self.verifier {
            verify_submission_token(verifier.as_ref(), token.as_deref()).await?;
        }

        self.dispatcher.dispatch(&submission).await?;
        Ok(())
    }
}

#[tracing::instrument(name = "Handling a contact form post", skip(payload, pipeline))]
pub async fn contact(
    payload: web::Json<ContactPayload>,
    pipeline: web::Data<ContactPipeline>,
) -> Result<HttpResponse, ContactError> {
    pipeline.submit(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(SuccessBody {
        message: SUCCESS_MESSAGE,
    }))
}

/// Turns body extraction failures into the same JSON error shape as the handler.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        ContactError::MalformedRequest(err.to_string()).into()
    })
}
