use crate::utils::error_chain_fmt;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub success: bool,
    #[serde(rename = "error-codes", default)]
    pub error_codes: Vec<String>,
}

#[derive(thiserror::Error)]
pub enum VerificationError {
    #[error("No verification token was submitted")]
    MissingToken,
    #[error("The verification service rejected the token: {0:?}")]
    Rejected(Vec<String>),
    #[error("The verification service could not be consulted")]
    Unavailable(#[source] anyhow::Error),
}

impl std::fmt::Debug for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Asks a third-party anti-automation service whether a token is genuine.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<VerificationOutcome, anyhow::Error>;
}

/// One attempt, no retry: the token is consumed by the service either way.
#[tracing::instrument(name = "Checking the submission token", skip(verifier, token))]
pub async fn verify_submission_token(
    verifier: &dyn TokenVerifier,
    token: Option<&str>,
) -> Result<(), VerificationError> {
    let token = token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(VerificationError::MissingToken)?;

    let outcome = verifier
        .verify_token(token)
        .await
        .map_err(VerificationError::Unavailable)?;

    if outcome.success {
        Ok(())
    } else {
        Err(VerificationError::Rejected(outcome.error_codes))
    }
}
