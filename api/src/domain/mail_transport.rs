use crate::utils::error_chain_fmt;
use async_trait::async_trait;

/// A fully rendered message, ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: String,
}

#[derive(thiserror::Error)]
pub enum DispatchError {
    #[error("The mail provider rejected the configured credentials")]
    Authentication(#[source] anyhow::Error),
    #[error("The mail provider could not be reached")]
    Transport(#[source] anyhow::Error),
    #[error("The mail provider failed to accept the message")]
    Delivery(#[source] anyhow::Error),
}

impl std::fmt::Debug for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// An authenticated channel to a mail provider.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Opens a session and checks that the configured credentials are accepted.
    async fn verify(&self) -> Result<(), DispatchError>;

    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError>;
}
