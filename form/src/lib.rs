//! Client-side state for the contact form.
//!
//! [`ContactForm`] holds what the visitor typed and the feedback shown after a
//! submission; [`ContactApiClient`] posts the serialized form to the contact
//! endpoint. Neither depends on a UI toolkit, so any front end can drive them.

mod client;
mod controller;
mod fields;

pub use client::{ContactApiClient, SubmissionResult};
pub use controller::{ContactForm, StatusKind, SubmitStatus};
pub use fields::{ContactFormFields, FormField, SubmissionPayload};
