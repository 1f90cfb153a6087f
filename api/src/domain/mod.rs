pub mod contact_email;
pub mod contact_submission;
pub mod mail_dispatcher;
pub mod mail_transport;
pub mod token_verifier;
