pub mod http_token_verifier;
pub mod smtp_mail_transport;

pub use http_token_verifier::HttpTokenVerifier;
pub use smtp_mail_transport::SmtpMailTransport;
